// Type constant table
//
// Canonical fragments for each primitive schema kind. The table itself is
// static data; `primitive` builds a fresh fragment on every call so the
// caller owns what it gets back.

use crate::schema::types::{SchemaFragment, TypeName, TypeSet};

/// Primitive kinds available from the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Object,
    Array,
    Boolean,
    Integer,
    Number,
    String,
    /// Unknown or unstructured payload
    Any,
}

/// Members of the unknown/any union. `number` already admits integers.
pub static ANY_TYPES: [TypeName; 5] = [
    TypeName::Object,
    TypeName::Array,
    TypeName::Boolean,
    TypeName::Number,
    TypeName::String,
];

/// Returns a new fragment for the given primitive kind
pub fn primitive(kind: Primitive) -> SchemaFragment {
    match kind {
        Primitive::Object => SchemaFragment::of_type(TypeName::Object),
        Primitive::Array => SchemaFragment::of_type(TypeName::Array),
        Primitive::Boolean => SchemaFragment::of_type(TypeName::Boolean),
        Primitive::Integer => SchemaFragment::of_type(TypeName::Integer),
        Primitive::Number => SchemaFragment::of_type(TypeName::Number),
        Primitive::String => SchemaFragment::of_type(TypeName::String),
        Primitive::Any => any(),
    }
}

/// The unknown/any fragment: a union of every non-null primitive type
pub fn any() -> SchemaFragment {
    let mut types = TypeSet::single(ANY_TYPES[0]);
    for name in &ANY_TYPES[1..] {
        types.insert(*name);
    }
    SchemaFragment::of_types(types)
}

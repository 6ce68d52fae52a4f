// Schema module for modelschema
//
// This module derives JSON Schema documents from ORM model descriptors.
// It includes:
//
// 1. Output schema types (fragments, model schemas, root document)
// 2. Model, attribute and association descriptors
// 3. Attribute type to schema fragment mapping rules
// 4. Nullability adapter and length resolution
// 5. Model and schema-set builders with include/exclude filters
// 6. JSON parser for descriptors and options

// Re-export public types and functions
pub use self::builder::model_schema;
pub use self::descriptor::{
    AssociationDescriptor, AssociationKind, AttributeDescriptor, Cardinality, ModelDescriptor, ModelRegistry, TypeTag,
};
pub use self::mapper::{attribute_schema, MapperConfig, SchemaMapper, UnknownTypePolicy};
pub use self::nullability::with_null;
pub use self::options::{ModelOptions, SchemaSetOptions};
pub use self::parser::SchemaParser;
pub use self::set::schema_set;
pub use self::types::{Format, ModelSchema, RootSchema, SchemaFragment, TypeName, TypeSet};
pub use self::utils::{Length, SizeAlias};

// Sub-modules
pub mod constants;
pub mod descriptor;
pub mod mapper;
pub mod nullability;
pub mod options;
pub mod parser;
pub mod types;
pub mod utils;

mod builder;
mod set;

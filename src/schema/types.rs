// Schema output types for modelschema
//
// This module defines the JSON Schema (draft-07) trees produced by the
// engine: type names and type unions, formats, property fragments, the
// per-model object schema and the root document holding all definitions.

use std::fmt;

use serde::ser::{Serialize, SerializeSeq, Serializer};
use serde_json::Value;

use crate::internal::error::Result;
use indexmap::IndexMap;

/// Dialect identifier written to `$schema` of every root document
pub const JSON_SCHEMA_DRAFT_07: &str = "http://json-schema.org/draft-07/schema#";

/// Prefix of every cross-model `$ref`
pub const DEFINITIONS_PREFIX: &str = "#/definitions/";

/// Represents the primitive type names of the interchange format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Object,
    Array,
    Boolean,
    Integer,
    Number,
    String,
    Null,
}

impl TypeName {
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Object => "object",
            TypeName::Array => "array",
            TypeName::Boolean => "boolean",
            TypeName::Integer => "integer",
            TypeName::Number => "number",
            TypeName::String => "string",
            TypeName::Null => "null",
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A non-empty set of distinct type names, kept in insertion order.
///
/// Serializes as a bare string when it holds exactly one name and as an
/// array otherwise, which is how the interchange format spells unions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeSet {
    names: Vec<TypeName>,
}

impl TypeSet {
    /// Creates a set holding a single type
    pub fn single(name: TypeName) -> Self {
        Self { names: vec![name] }
    }

    /// Creates a set from a list of names, dropping duplicates. Returns `None` when the list is empty.
    pub fn from_names<I: IntoIterator<Item = TypeName>>(names: I) -> Option<Self> {
        let mut set = Self { names: Vec::new() };
        for name in names {
            set.insert(name);
        }
        if set.names.is_empty() {
            None
        } else {
            Some(set)
        }
    }

    pub fn contains(&self, name: TypeName) -> bool {
        self.names.contains(&name)
    }

    /// Appends a name unless it is already present
    pub fn insert(&mut self, name: TypeName) {
        if !self.contains(name) {
            self.names.push(name);
        }
    }

    /// Removes a name. The last remaining name is never removed, returns whether anything changed.
    pub fn remove(&mut self, name: TypeName) -> bool {
        if self.names.len() > 1 && self.contains(name) {
            self.names.retain(|n| *n != name);
            true
        } else {
            false
        }
    }

    pub fn names(&self) -> &[TypeName] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }
}

impl Serialize for TypeSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        if let [only] = self.names.as_slice() {
            return only.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.names.len()))?;
        for name in &self.names {
            seq.serialize_element(name)?;
        }
        seq.end()
    }
}

/// Value of the `format` keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Format {
    Int32,
    Int64,
    Float,
    Double,
    Date,
    DateTime,
    Time,
    Uuid,
    Ipv4,
    Ipv6,
}

/// Content encoding used for binary payloads carried in strings
pub const BASE64_ENCODING: &str = "base64";

/// One node of a produced schema tree.
///
/// Fragments are plain owned values: every constructor and every adapter
/// returns a fresh tree, so callers may extend what they receive without
/// affecting any other result.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaFragment {
    /// `$ref` to another definition; a referencing fragment carries no `type`
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<Format>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaFragment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<SchemaFragment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_encoding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub any_of: Option<Vec<SchemaFragment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl SchemaFragment {
    /// Creates a fragment constrained to a single type
    pub fn of_type(name: TypeName) -> Self {
        Self {
            schema_type: Some(TypeSet::single(name)),
            ..Self::default()
        }
    }

    /// Creates a fragment constrained to a type union
    pub fn of_types(types: TypeSet) -> Self {
        Self {
            schema_type: Some(types),
            ..Self::default()
        }
    }

    /// Creates a pure reference to another model's definition
    pub fn reference(model_name: &str) -> Self {
        Self {
            reference: Some(format!("{}{}", DEFINITIONS_PREFIX, model_name)),
            ..Self::default()
        }
    }

    /// Creates an array fragment with the given element schema
    pub fn array_of(items: SchemaFragment) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of_type(TypeName::Array)
        }
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_max_length(mut self, max_length: Option<u64>) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_minimum(mut self, minimum: i64) -> Self {
        self.minimum = Some(minimum);
        self
    }

    pub fn with_enum(mut self, values: Vec<Value>) -> Self {
        self.enum_values = Some(values);
        self
    }

    /// True when this fragment only points at another definition
    pub fn is_reference(&self) -> bool {
        self.reference.is_some()
    }

    /// True when the type union admits null
    pub fn allows_null(&self) -> bool {
        self.schema_type
            .as_ref()
            .map_or(false, |types| types.contains(TypeName::Null))
    }

    /// Converts the fragment into a JSON value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

/// Object schema derived from one model
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ModelSchema {
    #[serde(rename = "type")]
    schema_type: TypeName,
    /// Properties in attribute declaration order, associations last
    pub properties: IndexMap<String, SchemaFragment>,
    /// Names of non-nullable properties; omitted from the output when empty
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ModelSchema {
    /// Creates an empty object schema
    pub fn new() -> Self {
        Self {
            schema_type: TypeName::Object,
            properties: IndexMap::new(),
            required: Vec::new(),
        }
    }

    pub fn schema_type(&self) -> TypeName {
        self.schema_type
    }

    pub fn property(&self, name: &str) -> Option<&SchemaFragment> {
        self.properties.get(name)
    }

    pub fn is_required(&self, name: &str) -> bool {
        self.required.iter().any(|r| r == name)
    }

    /// Converts the schema into a JSON value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl Default for ModelSchema {
    fn default() -> Self {
        Self::new()
    }
}

/// Root document holding one definition per model
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RootSchema {
    /// Dialect identifier, serialized as `$schema`
    #[serde(rename = "$schema")]
    pub schema_version: String,
    #[serde(rename = "type")]
    schema_type: TypeName,
    pub definitions: IndexMap<String, ModelSchema>,
}

impl RootSchema {
    /// Creates an empty draft-07 root document
    pub fn new() -> Self {
        Self {
            schema_version: JSON_SCHEMA_DRAFT_07.to_string(),
            schema_type: TypeName::Object,
            definitions: IndexMap::new(),
        }
    }

    pub fn schema_type(&self) -> TypeName {
        self.schema_type
    }

    pub fn definition(&self, model_name: &str) -> Option<&ModelSchema> {
        self.definitions.get(model_name)
    }

    /// Converts the document into a JSON value
    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Renders the document as indented JSON text
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for RootSchema {
    fn default() -> Self {
        Self::new()
    }
}

// Model descriptors consumed by modelschema
//
// These types carry what the host ORM's introspection layer knows about a
// model: typed attributes with nullability and type parameters, and the
// associations to other models. They are read-only inputs to the engine
// and can be built in code or deserialized from JSON.

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::internal::error::{Error, Result};
use crate::schema::utils::Length;

/// Source column type tags understood by the mapper
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum TypeTag {
    Boolean,
    TinyInt,
    SmallInt,
    MediumInt,
    Integer,
    BigInt,
    Float,
    Real,
    Double,
    Decimal,
    Numeric,
    Char,
    String,
    CiText,
    Text,
    Blob,
    Date,
    DateOnly,
    Time,
    Enum,
    Uuid,
    UuidV1,
    UuidV4,
    Inet,
    Cidr,
    MacAddr,
    Json,
    Jsonb,
    Hstore,
    Array,
    Virtual,
    /// Any tag without a dedicated rule; maps to the unknown/any fragment
    Other(String),
}

impl TypeTag {
    /// Canonical upper-case spelling of the tag
    pub fn name(&self) -> &str {
        match self {
            TypeTag::Boolean => "BOOLEAN",
            TypeTag::TinyInt => "TINYINT",
            TypeTag::SmallInt => "SMALLINT",
            TypeTag::MediumInt => "MEDIUMINT",
            TypeTag::Integer => "INTEGER",
            TypeTag::BigInt => "BIGINT",
            TypeTag::Float => "FLOAT",
            TypeTag::Real => "REAL",
            TypeTag::Double => "DOUBLE",
            TypeTag::Decimal => "DECIMAL",
            TypeTag::Numeric => "NUMERIC",
            TypeTag::Char => "CHAR",
            TypeTag::String => "STRING",
            TypeTag::CiText => "CITEXT",
            TypeTag::Text => "TEXT",
            TypeTag::Blob => "BLOB",
            TypeTag::Date => "DATE",
            TypeTag::DateOnly => "DATEONLY",
            TypeTag::Time => "TIME",
            TypeTag::Enum => "ENUM",
            TypeTag::Uuid => "UUID",
            TypeTag::UuidV1 => "UUIDV1",
            TypeTag::UuidV4 => "UUIDV4",
            TypeTag::Inet => "INET",
            TypeTag::Cidr => "CIDR",
            TypeTag::MacAddr => "MACADDR",
            TypeTag::Json => "JSON",
            TypeTag::Jsonb => "JSONB",
            TypeTag::Hstore => "HSTORE",
            TypeTag::Array => "ARRAY",
            TypeTag::Virtual => "VIRTUAL",
            TypeTag::Other(name) => name,
        }
    }
}

impl From<&str> for TypeTag {
    fn from(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "BOOLEAN" | "BOOL" => TypeTag::Boolean,
            "TINYINT" => TypeTag::TinyInt,
            "SMALLINT" => TypeTag::SmallInt,
            "MEDIUMINT" => TypeTag::MediumInt,
            "INTEGER" | "INT" => TypeTag::Integer,
            "BIGINT" => TypeTag::BigInt,
            "FLOAT" => TypeTag::Float,
            "REAL" => TypeTag::Real,
            "DOUBLE" | "DOUBLE PRECISION" => TypeTag::Double,
            "DECIMAL" => TypeTag::Decimal,
            "NUMERIC" | "NUMBER" => TypeTag::Numeric,
            "CHAR" => TypeTag::Char,
            "STRING" | "VARCHAR" => TypeTag::String,
            "CITEXT" => TypeTag::CiText,
            "TEXT" => TypeTag::Text,
            "BLOB" => TypeTag::Blob,
            "DATE" => TypeTag::Date,
            "DATEONLY" => TypeTag::DateOnly,
            "TIME" => TypeTag::Time,
            "ENUM" => TypeTag::Enum,
            "UUID" => TypeTag::Uuid,
            "UUIDV1" => TypeTag::UuidV1,
            "UUIDV4" => TypeTag::UuidV4,
            "INET" => TypeTag::Inet,
            "CIDR" => TypeTag::Cidr,
            "MACADDR" => TypeTag::MacAddr,
            "JSON" => TypeTag::Json,
            "JSONB" => TypeTag::Jsonb,
            "HSTORE" => TypeTag::Hstore,
            "ARRAY" => TypeTag::Array,
            "VIRTUAL" => TypeTag::Virtual,
            _ => TypeTag::Other(raw.trim().to_string()),
        }
    }
}

impl From<String> for TypeTag {
    fn from(raw: String) -> Self {
        TypeTag::from(raw.as_str())
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn default_allow_null() -> bool {
    true
}

/// Metadata for one model column
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeDescriptor {
    /// Selects the mapping rule
    #[serde(rename = "type")]
    pub type_tag: TypeTag,
    /// Nullable unless declared otherwise
    #[serde(default = "default_allow_null")]
    pub allow_null: bool,
    /// Character length or size class for text-like tags
    #[serde(default)]
    pub length: Option<Length>,
    /// Unsigned integer column
    #[serde(default)]
    pub unsigned: bool,
    /// Permitted values of an enumerated column
    #[serde(default, rename = "values")]
    pub enum_values: Option<Vec<Value>>,
    /// Element type of an array column
    #[serde(default)]
    pub inner_type: Option<Box<AttributeDescriptor>>,
    /// Declared result type of a computed column
    #[serde(default)]
    pub return_type: Option<Box<AttributeDescriptor>>,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub example: Option<Value>,
}

impl AttributeDescriptor {
    /// Creates a nullable attribute of the given type
    pub fn new(type_tag: impl Into<TypeTag>) -> Self {
        Self {
            type_tag: type_tag.into(),
            allow_null: true,
            length: None,
            unsigned: false,
            enum_values: None,
            inner_type: None,
            return_type: None,
            comment: None,
            example: None,
        }
    }

    /// Creates an array attribute with the given element type
    pub fn array(inner: AttributeDescriptor) -> Self {
        Self {
            inner_type: Some(Box::new(inner)),
            ..Self::new(TypeTag::Array)
        }
    }

    /// Creates a computed attribute, optionally declaring its result type
    pub fn computed(return_type: Option<AttributeDescriptor>) -> Self {
        Self {
            return_type: return_type.map(Box::new),
            ..Self::new(TypeTag::Virtual)
        }
    }

    /// Creates an enumerated attribute
    pub fn enumeration<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            enum_values: Some(values.into_iter().map(Into::into).collect()),
            ..Self::new(TypeTag::Enum)
        }
    }

    pub fn nullable(mut self, allow_null: bool) -> Self {
        self.allow_null = allow_null;
        self
    }

    pub fn not_null(self) -> Self {
        self.nullable(false)
    }

    pub fn with_length(mut self, length: Length) -> Self {
        self.length = Some(length);
        self
    }

    pub fn unsigned(mut self) -> Self {
        self.unsigned = true;
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_example(mut self, example: impl Into<Value>) -> Self {
        self.example = Some(example.into());
        self
    }
}

/// Plurality of an association as seen from the declaring model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// Yields a single reference
    OneToOne,
    /// Yields an array of references
    OneToMany,
}

/// Relationship kinds as declared on the host ORM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum AssociationKind {
    HasOne,
    BelongsTo,
    HasMany,
    BelongsToMany,
}

impl AssociationKind {
    pub fn cardinality(&self) -> Cardinality {
        match self {
            AssociationKind::HasOne | AssociationKind::BelongsTo => Cardinality::OneToOne,
            AssociationKind::HasMany | AssociationKind::BelongsToMany => Cardinality::OneToMany,
        }
    }
}

impl FromStr for AssociationKind {
    type Err = Error;

    fn from_str(raw: &str) -> Result<Self> {
        let normalized: String = raw
            .chars()
            .filter(|c| *c != '_' && *c != '-' && !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "hasone" => Ok(AssociationKind::HasOne),
            "belongsto" => Ok(AssociationKind::BelongsTo),
            "hasmany" => Ok(AssociationKind::HasMany),
            "belongstomany" => Ok(AssociationKind::BelongsToMany),
            _ => Err(Error::UnknownAssociationKind(raw.to_string())),
        }
    }
}

impl TryFrom<String> for AssociationKind {
    type Error = Error;

    fn try_from(raw: String) -> Result<Self> {
        raw.parse()
    }
}

/// A declared relationship from one model to another
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssociationDescriptor {
    pub kind: AssociationKind,
    /// Name of the referenced model
    pub target: String,
    /// Property name the association is exposed under
    #[serde(rename = "as")]
    pub accessor: String,
    /// Attribute of the declaring model that backs this association, if any
    #[serde(default)]
    pub foreign_key: Option<String>,
}

impl AssociationDescriptor {
    pub fn new(kind: AssociationKind, target: impl Into<String>, accessor: impl Into<String>) -> Self {
        Self {
            kind,
            target: target.into(),
            accessor: accessor.into(),
            foreign_key: None,
        }
    }

    pub fn with_foreign_key(mut self, foreign_key: impl Into<String>) -> Self {
        self.foreign_key = Some(foreign_key.into());
        self
    }

    pub fn cardinality(&self) -> Cardinality {
        self.kind.cardinality()
    }
}

/// A model: ordered attributes plus associations
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModelDescriptor {
    pub name: String,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeDescriptor>,
    #[serde(default)]
    pub associations: Vec<AssociationDescriptor>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            associations: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attribute: AttributeDescriptor) -> Self {
        self.attributes.insert(name.into(), attribute);
        self
    }

    pub fn with_association(mut self, association: AssociationDescriptor) -> Self {
        self.associations.push(association);
        self
    }

    pub fn association(&self, accessor: &str) -> Option<&AssociationDescriptor> {
        self.associations.iter().find(|a| a.accessor == accessor)
    }

    /// True when `name` is an attribute or an association accessor of this model
    pub fn declares(&self, name: &str) -> bool {
        self.attributes.contains_key(name) || self.association(name).is_some()
    }
}

/// Ordered collection of models, keyed by model name
#[derive(Debug, Clone, Default)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelDescriptor>,
}

impl ModelRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self { models: IndexMap::new() }
    }

    /// Registers a model; names must be unique
    pub fn register(&mut self, model: ModelDescriptor) -> Result<()> {
        if self.models.contains_key(&model.name) {
            return Err(Error::DuplicateModel(model.name));
        }
        self.models.insert(model.name.clone(), model);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ModelDescriptor> {
        self.models.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.models.contains_key(name)
    }

    /// Models in registration order
    pub fn models(&self) -> impl Iterator<Item = &ModelDescriptor> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

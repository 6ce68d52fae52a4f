// Attribute to schema mapping rules
//
// This module defines the mapping from attribute descriptors to schema
// fragments: one rule per known type tag, recursion for array and computed
// attributes, and a permissive fallback for tags without a rule.

use log::warn;

use crate::internal::error::{Error, Result};
use crate::schema::constants::{self, Primitive};
use crate::schema::descriptor::{AttributeDescriptor, TypeTag};
use crate::schema::nullability::with_null;
use crate::schema::types::{Format, SchemaFragment, TypeName, BASE64_ENCODING};
use crate::schema::utils::resolve_length;

/// How the mapper treats type tags it has no rule for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownTypePolicy {
    /// Emit a warning and fall back to the unknown/any fragment
    #[default]
    Permissive,
    /// Fail with [`Error::UnsupportedType`]
    Reject,
}

/// Configuration for attribute mapping
#[derive(Debug, Clone, Default)]
pub struct MapperConfig {
    /// Treatment of unrecognized type tags
    pub unknown_types: UnknownTypePolicy,
}

/// Schema mapper turning descriptors into schema fragments
#[derive(Debug, Clone, Default)]
pub struct SchemaMapper {
    config: MapperConfig,
}

impl SchemaMapper {
    /// Creates a new schema mapper with default configuration
    pub fn new() -> Self {
        Self {
            config: MapperConfig::default(),
        }
    }

    /// Creates a new schema mapper with custom configuration
    pub fn with_config(config: MapperConfig) -> Self {
        Self { config }
    }

    /// Maps an attribute to its property schema, nullability and annotations included
    pub fn attribute_schema(&self, attr: &AttributeDescriptor) -> Result<SchemaFragment> {
        self.property_schema(attr, attr.allow_null)
    }

    /// Maps an attribute's type to a fragment without applying nullability
    pub fn type_schema(&self, attr: &AttributeDescriptor) -> Result<SchemaFragment> {
        let fragment = match &attr.type_tag {
            TypeTag::Boolean => constants::primitive(Primitive::Boolean),

            TypeTag::TinyInt | TypeTag::SmallInt | TypeTag::MediumInt | TypeTag::Integer => {
                integer_schema(Format::Int32, attr.unsigned)
            }
            TypeTag::BigInt => integer_schema(Format::Int64, attr.unsigned),

            // Only explicit single/double precision carries a format
            TypeTag::Float => constants::primitive(Primitive::Number).with_format(Format::Float),
            TypeTag::Double => constants::primitive(Primitive::Number).with_format(Format::Double),
            TypeTag::Real | TypeTag::Decimal | TypeTag::Numeric => constants::primitive(Primitive::Number),

            TypeTag::Char | TypeTag::String | TypeTag::CiText | TypeTag::Text => {
                constants::primitive(Primitive::String).with_max_length(resolve_length(attr.length.as_ref()))
            }

            TypeTag::Blob => SchemaFragment {
                content_encoding: Some(BASE64_ENCODING.to_string()),
                ..constants::primitive(Primitive::String)
            },

            TypeTag::Date => constants::primitive(Primitive::String).with_format(Format::DateTime),
            TypeTag::DateOnly => constants::primitive(Primitive::String).with_format(Format::Date),
            TypeTag::Time => constants::primitive(Primitive::String).with_format(Format::Time),

            TypeTag::Enum => match &attr.enum_values {
                Some(values) => constants::primitive(Primitive::String).with_enum(values.clone()),
                None => constants::primitive(Primitive::String),
            },

            TypeTag::Uuid | TypeTag::UuidV1 | TypeTag::UuidV4 => {
                constants::primitive(Primitive::String).with_format(Format::Uuid)
            }

            TypeTag::Inet => inet_schema(),
            TypeTag::Cidr | TypeTag::MacAddr => constants::primitive(Primitive::String),

            TypeTag::Json | TypeTag::Jsonb => constants::any(),

            TypeTag::Hstore => SchemaFragment {
                additional_properties: Some(Box::new(constants::primitive(Primitive::String))),
                ..constants::primitive(Primitive::Object)
            },

            TypeTag::Array => self.array_schema(attr)?,
            TypeTag::Virtual => self.computed_schema(attr)?,

            TypeTag::Other(name) => self.unknown_schema(name)?,
        };

        Ok(fragment)
    }

    fn property_schema(&self, attr: &AttributeDescriptor, allow_null: bool) -> Result<SchemaFragment> {
        let mut fragment = with_null(self.type_schema(attr)?, allow_null)?;
        if let Some(comment) = &attr.comment {
            fragment.description = Some(comment.clone());
        }
        if let Some(example) = &attr.example {
            fragment.example = Some(example.clone());
        }
        Ok(fragment)
    }

    /// Elements never inherit the nullability of the array property itself
    fn array_schema(&self, attr: &AttributeDescriptor) -> Result<SchemaFragment> {
        let inner = attr
            .inner_type
            .as_deref()
            .ok_or_else(|| Error::MissingInnerType(attr.type_tag.to_string()))?;
        let items = self.property_schema(inner, false)?;
        Ok(SchemaFragment::array_of(items))
    }

    /// Computed attributes forward to their declared return type; without one the value is assumed to be a string
    fn computed_schema(&self, attr: &AttributeDescriptor) -> Result<SchemaFragment> {
        match attr.return_type.as_deref() {
            Some(return_type) => self.type_schema(return_type),
            None => Ok(constants::primitive(Primitive::String)),
        }
    }

    fn unknown_schema(&self, name: &str) -> Result<SchemaFragment> {
        match self.config.unknown_types {
            UnknownTypePolicy::Permissive => {
                warn!("Unable to convert type '{}' to a schema property, using an unrestricted schema", name);
                Ok(constants::any())
            }
            UnknownTypePolicy::Reject => Err(Error::UnsupportedType(name.to_string())),
        }
    }
}

fn integer_schema(format: Format, unsigned: bool) -> SchemaFragment {
    let fragment = constants::primitive(Primitive::Integer).with_format(format);
    if unsigned {
        fragment.with_minimum(0)
    } else {
        fragment
    }
}

/// Either address family, under one string type
fn inet_schema() -> SchemaFragment {
    let family = |format| SchemaFragment {
        format: Some(format),
        ..SchemaFragment::default()
    };
    SchemaFragment {
        any_of: Some(vec![family(Format::Ipv4), family(Format::Ipv6)]),
        ..SchemaFragment::of_type(TypeName::String)
    }
}

/// Maps an attribute with the default mapper configuration
pub fn attribute_schema(attr: &AttributeDescriptor) -> Result<SchemaFragment> {
    SchemaMapper::new().attribute_schema(attr)
}

// Model schema builder
//
// Turns one model descriptor into an object schema: filtered attributes in
// declaration order, a required list for non-nullable attributes, and
// association references keyed by accessor name.

use std::collections::HashSet;

use log::{debug, trace};

use crate::internal::error::{Error, Result};
use crate::schema::descriptor::{AssociationDescriptor, Cardinality, ModelDescriptor};
use crate::schema::mapper::SchemaMapper;
use crate::schema::options::ModelOptions;
use crate::schema::types::{ModelSchema, SchemaFragment};

impl SchemaMapper {
    /// Builds the object schema of `model`.
    ///
    /// Every name listed in `options` must be declared by the model.
    pub fn model_schema(&self, model: &ModelDescriptor, options: &ModelOptions) -> Result<ModelSchema> {
        options.validate_for(model)?;
        self.build_model_schema(model, options)
    }

    /// Builds without checking filter names against the model
    pub(crate) fn build_model_schema(&self, model: &ModelDescriptor, options: &ModelOptions) -> Result<ModelSchema> {
        let resolve = options.resolves_associations();

        // Foreign keys backing an association are replaced by the reference itself
        let backing_keys: HashSet<&str> = if resolve {
            model
                .associations
                .iter()
                .filter_map(|a| a.foreign_key.as_deref())
                .collect()
        } else {
            HashSet::new()
        };

        let mut schema = ModelSchema::new();

        for (name, attr) in model.attributes.iter() {
            if !options.admits(name) {
                trace!("Skipping filtered attribute '{}.{}'", model.name, name);
                continue;
            }
            if backing_keys.contains(name.as_str()) {
                trace!("Skipping foreign key '{}.{}' in favour of its association", model.name, name);
                continue;
            }

            let fragment = self.attribute_schema(attr).map_err(|source| Error::Attribute {
                model: model.name.clone(),
                attribute: name.to_string(),
                source: Box::new(source),
            })?;

            if !attr.allow_null {
                schema.required.push(name.to_string());
            }
            schema.properties.insert(name.clone(), fragment);
        }

        if resolve {
            for association in &model.associations {
                if !options.admits(&association.accessor) {
                    continue;
                }
                if schema.properties.contains_key(&association.accessor) {
                    return Err(Error::ConfigError(format!(
                        "model '{}' emits property '{}' more than once",
                        model.name, association.accessor
                    )));
                }
                if options.requires_association(&association.accessor) && !schema.is_required(&association.accessor) {
                    schema.required.push(association.accessor.clone());
                }
                schema
                    .properties
                    .insert(association.accessor.clone(), association_schema(association));
            }
        }

        debug!(
            "Built schema for model '{}' ({} properties, {} required)",
            model.name,
            schema.properties.len(),
            schema.required.len()
        );

        Ok(schema)
    }
}

/// Associations become named references; the target is never inlined
fn association_schema(association: &AssociationDescriptor) -> SchemaFragment {
    let reference = SchemaFragment::reference(&association.target);
    match association.cardinality() {
        Cardinality::OneToOne => reference,
        Cardinality::OneToMany => SchemaFragment::array_of(reference),
    }
}

/// Builds a model schema with the default mapper configuration
pub fn model_schema(model: &ModelDescriptor, options: &ModelOptions) -> Result<ModelSchema> {
    SchemaMapper::new().model_schema(model, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::error::ErrorKind;
    use crate::schema::descriptor::{AssociationKind, AttributeDescriptor, TypeTag};
    use crate::schema::types::TypeName;
    use crate::schema::utils::Length;
    use proptest::prelude::*;
    use serde_json::json;

    fn foo_model() -> ModelDescriptor {
        ModelDescriptor::new("Foo")
            .with_attribute("id", AttributeDescriptor::new(TypeTag::Integer).not_null())
            .with_attribute("barId", AttributeDescriptor::new(TypeTag::Integer))
            .with_attribute("title", AttributeDescriptor::new(TypeTag::String).with_length(Length::Chars(255)))
            .with_association(AssociationDescriptor::new(AssociationKind::BelongsTo, "Bar", "Bar").with_foreign_key("barId"))
            .with_association(AssociationDescriptor::new(AssociationKind::HasMany, "Bar", "Bars"))
    }

    #[test]
    fn test_empty_model() {
        let schema = model_schema(&ModelDescriptor::new("Empty"), &ModelOptions::default()).unwrap();
        assert_eq!(schema.schema_type(), TypeName::Object);
        assert!(schema.properties.is_empty());
        assert_eq!(schema.to_value().unwrap(), json!({ "type": "object", "properties": {} }));
    }

    #[test]
    fn test_associations_become_references() {
        let schema = model_schema(&foo_model(), &ModelOptions::default()).unwrap();
        assert_eq!(
            schema.to_value().unwrap(),
            json!({
                "type": "object",
                "properties": {
                    "id": { "type": "integer", "format": "int32" },
                    "title": { "type": ["string", "null"], "maxLength": 255 },
                    "Bar": { "$ref": "#/definitions/Bar" },
                    "Bars": { "type": "array", "items": { "$ref": "#/definitions/Bar" } }
                },
                "required": ["id"]
            })
        );
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "title", "Bar", "Bars"]);
    }

    #[test]
    fn test_unresolved_associations_keep_foreign_keys() {
        let options = ModelOptions::new().resolve_associations(false);
        let schema = model_schema(&foo_model(), &options).unwrap();
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "barId", "title"]);
    }

    #[test]
    fn test_filters_apply_to_attributes_and_associations() {
        let options = ModelOptions::new().include(["id", "title", "Bars"]).exclude(["title"]);
        let schema = model_schema(&foo_model(), &options).unwrap();
        let keys: Vec<&str> = schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "Bars"]);
    }

    #[test]
    fn test_required_associations() {
        let options = ModelOptions::new().require_association("Bar");
        let schema = model_schema(&foo_model(), &options).unwrap();
        assert_eq!(schema.required, vec!["id".to_string(), "Bar".to_string()]);
        assert!(!schema.is_required("Bars"));
    }

    #[test]
    fn test_unknown_filter_entry_fails() {
        let err = model_schema(&foo_model(), &ModelOptions::new().exclude(["password"])).unwrap_err();
        assert!(matches!(err, Error::UnknownFilterEntry { ref model, ref name } if model == "Foo" && name == "password"));
    }

    #[test]
    fn test_accessor_clashing_with_attribute_fails() {
        let model = ModelDescriptor::new("Post")
            .with_attribute("author", AttributeDescriptor::new(TypeTag::String).not_null())
            .with_association(AssociationDescriptor::new(AssociationKind::BelongsTo, "User", "author"));

        let err = model_schema(&model, &ModelOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(err.to_string(), "Config Error: model 'Post' emits property 'author' more than once");

        // Without resolution only the attribute is emitted
        let schema = model_schema(&model, &ModelOptions::new().resolve_associations(false)).unwrap();
        assert_eq!(schema.property("author").unwrap().to_value().unwrap(), json!({ "type": "string" }));
        assert_eq!(schema.required, vec!["author".to_string()]);

        // A backing key sharing the accessor name is hidden, so nothing clashes
        let model = ModelDescriptor::new("Post")
            .with_attribute("author", AttributeDescriptor::new(TypeTag::Integer).not_null())
            .with_association(AssociationDescriptor::new(AssociationKind::BelongsTo, "User", "author").with_foreign_key("author"));
        let schema = model_schema(&model, &ModelOptions::default()).unwrap();
        assert_eq!(schema.property("author").unwrap().to_value().unwrap(), json!({ "$ref": "#/definitions/User" }));
        assert!(schema.required.is_empty());
    }

    #[test]
    fn test_duplicate_accessors_fail() {
        let model = ModelDescriptor::new("Foo")
            .with_association(AssociationDescriptor::new(AssociationKind::HasOne, "Bar", "bar"))
            .with_association(AssociationDescriptor::new(AssociationKind::HasMany, "Bar", "bar"));
        let err = model_schema(&model, &ModelOptions::default()).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_attribute_errors_carry_context() {
        let model = ModelDescriptor::new("Tagged").with_attribute("tags", AttributeDescriptor::new(TypeTag::Array));
        let err = model_schema(&model, &ModelOptions::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "attribute 'Tagged.tags': Config Error: array type 'ARRAY' requires an explicit inner type"
        );
    }

    #[test]
    fn test_unknown_type_does_not_block_model() {
        let model = ModelDescriptor::new("Place")
            .with_attribute("name", AttributeDescriptor::new(TypeTag::String).not_null())
            .with_attribute("shape", AttributeDescriptor::new("GEOMETRY"));
        let schema = model_schema(&model, &ModelOptions::default()).unwrap();
        assert_eq!(schema.properties.len(), 2);
        assert!(schema.property("shape").unwrap().allows_null());
    }

    fn tag_strategy() -> impl Strategy<Value = TypeTag> {
        prop_oneof![
            Just(TypeTag::Boolean),
            Just(TypeTag::Integer),
            Just(TypeTag::BigInt),
            Just(TypeTag::Double),
            Just(TypeTag::Text),
            Just(TypeTag::DateOnly),
            Just(TypeTag::Uuid),
            Just(TypeTag::Json),
            Just(TypeTag::Inet),
        ]
    }

    proptest! {
        #[test]
        fn prop_required_matches_nullability(columns in prop::collection::vec((tag_strategy(), any::<bool>()), 0..12)) {
            let mut model = ModelDescriptor::new("Generated");
            for (i, (tag, allow_null)) in columns.iter().enumerate() {
                model = model.with_attribute(format!("col{}", i), AttributeDescriptor::new(tag.clone()).nullable(*allow_null));
            }

            let schema = model_schema(&model, &ModelOptions::default()).unwrap();
            for (name, attr) in model.attributes.iter() {
                let fragment = schema.property(name).unwrap();
                prop_assert_eq!(schema.is_required(name), !attr.allow_null);
                prop_assert_eq!(fragment.allows_null(), attr.allow_null);
            }
        }
    }
}

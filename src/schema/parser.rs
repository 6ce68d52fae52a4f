// JSON parser for modelschema inputs
//
// This module reads model registries, single models and build options from
// JSON documents. Option documents are checked for removed keys before they
// are deserialized so callers get a migration hint instead of a silent no-op.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::internal::error::{Error, Result};
use crate::schema::descriptor::{AttributeDescriptor, ModelDescriptor, ModelRegistry, TypeTag};
use crate::schema::options::{ModelOptions, SchemaSetOptions};

/// Option keys that used to exist, with what to do instead
const LEGACY_OPTIONS: [(&str, &str); 4] = [
    (
        "alwaysRequired",
        "required properties are derived from each attribute's allowNull flag",
    ),
    ("allowNull", "nullability is taken from each attribute descriptor"),
    ("private", "use 'exclude' instead"),
    ("attributes", "use 'include' instead"),
];

/// Parser for JSON model and option documents
#[derive(Debug, Default)]
pub struct SchemaParser {
    /// Custom tag mappings (source tag name -> tag with a mapping rule)
    type_aliases: HashMap<String, TypeTag>,
}

impl SchemaParser {
    /// Creates a new parser
    pub fn new() -> Self {
        Self {
            type_aliases: HashMap::new(),
        }
    }

    /// Maps a tag without a rule of its own onto one that has one (e.g. `GEOGRAPHY` -> `JSON`)
    pub fn add_type_alias(&mut self, name: &str, tag: TypeTag) {
        self.type_aliases.insert(name.trim().to_ascii_uppercase(), tag);
    }

    /// Parses a JSON array of models into a registry, keeping document order
    pub fn parse_registry(&self, json: &str) -> Result<ModelRegistry> {
        let models: Vec<ModelDescriptor> = serde_json::from_str(json)?;
        let mut registry = ModelRegistry::new();
        for mut model in models {
            self.apply_aliases(&mut model);
            registry.register(model)?;
        }
        Ok(registry)
    }

    /// Parses a single model document
    pub fn parse_model(&self, json: &str) -> Result<ModelDescriptor> {
        let mut model: ModelDescriptor = serde_json::from_str(json)?;
        self.apply_aliases(&mut model);
        Ok(model)
    }

    /// Parses options for a single model build
    pub fn parse_model_options(&self, json: &Value) -> Result<ModelOptions> {
        reject_legacy_options(expect_object(json, "model options")?)?;
        Ok(ModelOptions::deserialize(json)?)
    }

    /// Parses options for a schema-set build, including every per-model override
    pub fn parse_set_options(&self, json: &Value) -> Result<SchemaSetOptions> {
        let obj = expect_object(json, "schema set options")?;
        reject_legacy_options(obj)?;

        if let Some(per_model) = obj.get("perModel") {
            for (model_name, overrides) in expect_object(per_model, "perModel")? {
                let overrides = expect_object(overrides, model_name)?;
                reject_legacy_options(overrides)?;
            }
        }

        Ok(SchemaSetOptions::deserialize(json)?)
    }

    fn apply_aliases(&self, model: &mut ModelDescriptor) {
        if self.type_aliases.is_empty() {
            return;
        }
        for attr in model.attributes.values_mut() {
            self.alias_attribute(attr);
        }
    }

    fn alias_attribute(&self, attr: &mut AttributeDescriptor) {
        if let TypeTag::Other(name) = &attr.type_tag {
            if let Some(tag) = self.type_aliases.get(&name.to_ascii_uppercase()) {
                attr.type_tag = tag.clone();
            }
        }
        if let Some(inner) = attr.inner_type.as_deref_mut() {
            self.alias_attribute(inner);
        }
        if let Some(return_type) = attr.return_type.as_deref_mut() {
            self.alias_attribute(return_type);
        }
    }
}

impl ModelOptions {
    /// Reads model options from JSON, rejecting removed keys
    pub fn from_json(json: &Value) -> Result<Self> {
        SchemaParser::new().parse_model_options(json)
    }
}

impl SchemaSetOptions {
    /// Reads schema-set options from JSON, rejecting removed keys
    pub fn from_json(json: &Value) -> Result<Self> {
        SchemaParser::new().parse_set_options(json)
    }
}

impl ModelRegistry {
    /// Reads a JSON array of models
    pub fn from_json_str(json: &str) -> Result<Self> {
        SchemaParser::new().parse_registry(json)
    }
}

fn expect_object<'a>(json: &'a Value, what: &str) -> Result<&'a Map<String, Value>> {
    json.as_object()
        .ok_or_else(|| Error::ConfigError(format!("{} must be a JSON object", what)))
}

fn reject_legacy_options(obj: &Map<String, Value>) -> Result<()> {
    for (option, hint) in LEGACY_OPTIONS {
        if obj.contains_key(option) {
            return Err(Error::LegacyOption {
                option: option.to_string(),
                hint,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::internal::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_registry_keeps_order() {
        let registry = ModelRegistry::from_json_str(
            r#"[
                { "name": "User", "attributes": { "id": { "type": "INTEGER", "allowNull": false }, "email": { "type": "STRING" } } },
                { "name": "Post", "attributes": { "title": { "type": "STRING" } } }
            ]"#,
        )
        .unwrap();

        let names: Vec<&str> = registry.models().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["User", "Post"]);

        let user = registry.get("User").unwrap();
        let attrs: Vec<&str> = user.attributes.keys().map(String::as_str).collect();
        assert_eq!(attrs, vec!["id", "email"]);
    }

    #[test]
    fn test_parse_registry_rejects_duplicates() {
        let err = ModelRegistry::from_json_str(r#"[{ "name": "User" }, { "name": "User" }]"#).unwrap_err();
        assert!(matches!(err, Error::DuplicateModel(_)));
    }

    #[test]
    fn test_type_aliases_rewrite_unknown_tags() {
        let mut parser = SchemaParser::new();
        parser.add_type_alias("geography", TypeTag::Json);

        let model = parser
            .parse_model(
                r#"{ "name": "Place", "attributes": {
                    "area": { "type": "GEOGRAPHY" },
                    "tags": { "type": "ARRAY", "innerType": { "type": "Geography" } }
                } }"#,
            )
            .unwrap();

        assert_eq!(model.attributes.get("area").unwrap().type_tag, TypeTag::Json);
        let tags = model.attributes.get("tags").unwrap();
        assert_eq!(tags.inner_type.as_ref().unwrap().type_tag, TypeTag::Json);
    }

    #[test]
    fn test_model_options_from_json() {
        let options = ModelOptions::from_json(&json!({
            "include": ["title"],
            "exclude": ["password"],
            "resolveAssociations": false
        }))
        .unwrap();
        assert_eq!(options.include, Some(vec!["title".to_string()]));
        assert!(!options.resolves_associations());
    }

    #[test]
    fn test_legacy_options_fail_fast() {
        for key in ["alwaysRequired", "allowNull", "private", "attributes"] {
            let err = ModelOptions::from_json(&json!({ key: true })).unwrap_err();
            assert!(matches!(err, Error::LegacyOption { ref option, .. } if option == key));
            assert_eq!(err.kind(), ErrorKind::Configuration);
        }

        let err = SchemaSetOptions::from_json(&json!({
            "perModel": { "User": { "private": ["password"] } }
        }))
        .unwrap_err();
        assert!(matches!(err, Error::LegacyOption { ref option, .. } if option == "private"));
    }

    #[test]
    fn test_unknown_option_keys_are_rejected() {
        let err = ModelOptions::from_json(&json!({ "excludes": ["x"] })).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Serialization);

        let err = ModelOptions::from_json(&json!(["x"])).unwrap_err();
        assert!(matches!(err, Error::ConfigError(_)));
    }

    #[test]
    fn test_set_options_from_json() {
        let options = SchemaSetOptions::from_json(&json!({
            "exclude": ["createdAt"],
            "perModel": { "User": { "exclude": ["password"] } }
        }))
        .unwrap();
        assert_eq!(options.options_for("User").exclude, vec!["createdAt".to_string(), "password".to_string()]);
    }
}

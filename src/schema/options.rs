// Options for model and schema-set builds
//
// Filters select which attributes and associations become properties.
// Options handed directly to a model build are explicit: every name they
// mention must exist on the model. Schema-set filters apply to all models
// at once and silently skip names a model does not declare.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::internal::error::{Error, Result};
use crate::schema::descriptor::ModelDescriptor;

/// Options for building one model schema
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ModelOptions {
    /// Allow-list of attribute and association names; `None` admits everything
    #[serde(default)]
    pub include: Option<Vec<String>>,
    /// Deny-list, applied after `include` and winning over it
    #[serde(default)]
    pub exclude: Vec<String>,
    /// Emit associations as references and hide their backing keys (default: true)
    #[serde(default)]
    pub resolve_associations: Option<bool>,
    /// Association accessors to list in `required`
    #[serde(default)]
    pub required_associations: Vec<String>,
}

impl ModelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn resolve_associations(mut self, resolve: bool) -> Self {
        self.resolve_associations = Some(resolve);
        self
    }

    pub fn require_association(mut self, accessor: impl Into<String>) -> Self {
        self.required_associations.push(accessor.into());
        self
    }

    pub fn resolves_associations(&self) -> bool {
        self.resolve_associations.unwrap_or(true)
    }

    /// True when `name` passes the include and exclude filters
    pub fn admits(&self, name: &str) -> bool {
        if self.exclude.iter().any(|n| n == name) {
            return false;
        }
        match &self.include {
            Some(include) => include.iter().any(|n| n == name),
            None => true,
        }
    }

    pub fn requires_association(&self, accessor: &str) -> bool {
        self.required_associations.iter().any(|n| n == accessor)
    }

    /// Checks that every explicitly named entry exists on `model`
    pub fn validate_for(&self, model: &ModelDescriptor) -> Result<()> {
        let filtered = self.include.iter().flatten().chain(self.exclude.iter());
        for name in filtered {
            if !model.declares(name) {
                return Err(Error::UnknownFilterEntry {
                    model: model.name.clone(),
                    name: name.clone(),
                });
            }
        }
        for accessor in &self.required_associations {
            if model.association(accessor).is_none() {
                return Err(Error::UnknownFilterEntry {
                    model: model.name.clone(),
                    name: accessor.clone(),
                });
            }
        }
        Ok(())
    }
}

/// Options for building the schema of a whole registry
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SchemaSetOptions {
    /// Allow-list applied to every model unless a per-model override sets its own
    #[serde(default)]
    pub include: Option<Vec<String>>,
    /// Deny-list applied to every model, merged with per-model deny-lists
    #[serde(default)]
    pub exclude: Vec<String>,
    #[serde(default)]
    pub resolve_associations: Option<bool>,
    /// Overrides keyed by model name
    #[serde(default)]
    pub per_model: BTreeMap<String, ModelOptions>,
}

impl SchemaSetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn include<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(names.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn resolve_associations(mut self, resolve: bool) -> Self {
        self.resolve_associations = Some(resolve);
        self
    }

    pub fn with_model(mut self, model_name: impl Into<String>, options: ModelOptions) -> Self {
        self.per_model.insert(model_name.into(), options);
        self
    }

    /// Effective options for one model: the override's include replaces the
    /// global one, deny-lists are merged, the override's flags win.
    pub fn options_for(&self, model_name: &str) -> ModelOptions {
        let local = self.per_model.get(model_name);

        let include = local
            .and_then(|o| o.include.clone())
            .or_else(|| self.include.clone());

        let mut exclude = self.exclude.clone();
        if let Some(local) = local {
            for name in &local.exclude {
                if !exclude.contains(name) {
                    exclude.push(name.clone());
                }
            }
        }

        ModelOptions {
            include,
            exclude,
            resolve_associations: local
                .and_then(|o| o.resolve_associations)
                .or(self.resolve_associations),
            required_associations: local
                .map(|o| o.required_associations.clone())
                .unwrap_or_default(),
        }
    }
}

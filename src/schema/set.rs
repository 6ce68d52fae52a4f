// Schema-set builder
//
// Builds one definition per registered model under a single draft-07 root.
// Associations stay named references into `definitions`, so models that
// point at each other are emitted once each and the build always terminates.

use log::debug;

use crate::internal::error::{Error, Result};
use crate::schema::descriptor::{ModelDescriptor, ModelRegistry};
use crate::schema::mapper::SchemaMapper;
use crate::schema::options::{ModelOptions, SchemaSetOptions};
use crate::schema::types::RootSchema;

impl SchemaMapper {
    /// Builds the root schema for every model in `registry`, in registration order.
    pub fn schema_set(&self, registry: &ModelRegistry, options: &SchemaSetOptions) -> Result<RootSchema> {
        for model_name in options.per_model.keys() {
            if !registry.contains(model_name) {
                return Err(Error::UnknownModel(model_name.clone()));
            }
        }

        let mut root = RootSchema::new();
        for model in registry.models() {
            // Overrides are explicit and checked; global filters are not
            if let Some(local) = options.per_model.get(&model.name) {
                local.validate_for(model)?;
            }

            let merged = options.options_for(&model.name);
            check_targets(registry, model, &merged)?;

            let schema = self.build_model_schema(model, &merged)?;
            root.definitions.insert(model.name.clone(), schema);
        }

        debug!("Built schema set with {} definitions", root.definitions.len());
        Ok(root)
    }
}

/// Every emitted reference must resolve to a definition in the same document
fn check_targets(registry: &ModelRegistry, model: &ModelDescriptor, options: &ModelOptions) -> Result<()> {
    if !options.resolves_associations() {
        return Ok(());
    }
    model
        .associations
        .iter()
        .filter(|a| options.admits(&a.accessor))
        .find(|a| !registry.contains(&a.target))
        .map_or(Ok(()), |a| Err(Error::UnknownModel(a.target.clone())))
}

/// Builds a schema set with the default mapper configuration
pub fn schema_set(registry: &ModelRegistry, options: &SchemaSetOptions) -> Result<RootSchema> {
    SchemaMapper::new().schema_set(registry, options)
}

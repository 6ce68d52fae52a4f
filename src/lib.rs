// modelschema library entry point
//
// Derives draft-07 JSON Schema definitions from ORM model descriptors.

pub mod internal;
pub mod schema;

pub use internal::error::{Error, ErrorKind, Result};
pub use schema::{attribute_schema, model_schema, schema_set};

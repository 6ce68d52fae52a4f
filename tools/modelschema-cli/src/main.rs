//! Command-line front end for modelschema
//!
//! Reads a JSON array of model descriptors and prints the derived draft-07
//! schema document, or the object schema of a single model.

use std::fs;
use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use modelschema::schema::{MapperConfig, ModelOptions, SchemaMapper, SchemaParser, SchemaSetOptions, TypeTag, UnknownTypePolicy};
use serde_json::Value;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "modelschema")]
struct Cli {
    /// Model registry file (JSON array of models)
    #[arg(value_name = "REGISTRY")]
    registry: PathBuf,

    /// Options file (schema-set options, or model options with --model)
    #[arg(short, long, value_name = "FILE")]
    options: Option<PathBuf>,

    /// Print only the schema of this model
    #[arg(short, long, value_name = "NAME")]
    model: Option<String>,

    /// Map an unrecognized type tag onto a known one, e.g. GEOMETRY=JSON
    #[arg(long = "alias", value_name = "NAME=TAG", value_parser = parse_alias)]
    aliases: Vec<(String, String)>,

    /// Fail on unrecognized type tags instead of emitting an unrestricted schema
    #[arg(long)]
    strict: bool,

    /// Print the document on a single line
    #[arg(long)]
    compact: bool,
}

fn parse_alias(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, tag)) if !name.trim().is_empty() && !tag.trim().is_empty() => {
            Ok((name.trim().to_string(), tag.trim().to_string()))
        }
        _ => Err(format!("expected NAME=TAG, got '{}'", raw)),
    }
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let cli = Cli::parse();

    let mut parser = SchemaParser::new();
    for (name, tag) in &cli.aliases {
        parser.add_type_alias(name, TypeTag::from(tag.as_str()));
    }

    let registry = parser.parse_registry(&fs::read_to_string(&cli.registry)?)?;
    info!("Loaded {} models from {}", registry.len(), cli.registry.display());

    let options = cli.options.as_deref().map(read_json).transpose()?;

    let mapper = SchemaMapper::with_config(MapperConfig {
        unknown_types: if cli.strict {
            UnknownTypePolicy::Reject
        } else {
            UnknownTypePolicy::Permissive
        },
    });

    let document = match &cli.model {
        Some(name) => {
            let model = registry
                .get(name)
                .ok_or_else(|| modelschema::Error::UnknownModel(name.clone()))?;
            let options = match &options {
                Some(json) => parser.parse_model_options(json)?,
                None => ModelOptions::default(),
            };
            mapper.model_schema(model, &options)?.to_value()?
        }
        None => {
            let options = match &options {
                Some(json) => parser.parse_set_options(json)?,
                None => SchemaSetOptions::default(),
            };
            mapper.schema_set(&registry, &options)?.to_value()?
        }
    };

    let rendered = if cli.compact {
        serde_json::to_string(&document)?
    } else {
        serde_json::to_string_pretty(&document)?
    };
    println!("{}", rendered);

    Ok(())
}

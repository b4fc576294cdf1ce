//! Output formatting for CLI

use clap::ValueEnum;
use serde_json::Value as Json;
use serde_yaml::Value as Yaml;

use super::error::CliError;
use crate::inference::InferenceStats;
use crate::projection::{Value, to_json};
use crate::schema::{Schema, to_json as schema_to_json, to_string_pretty};

/// Schema output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Indented Avro JSON (`.avsc`)
    #[default]
    Json,
    Yaml,
}

/// Render a schema in the requested format
pub fn format_schema(schema: &Schema, format: OutputFormat) -> Result<String, CliError> {
    match format {
        OutputFormat::Json => to_string_pretty(schema).map_err(|e| CliError::Output(e.to_string())),
        OutputFormat::Yaml => {
            let json = schema_to_json(schema).map_err(|e| CliError::Output(e.to_string()))?;
            serde_yaml::to_string(&json_to_yaml(&json)).map_err(|e| CliError::Output(e.to_string()))
        }
    }
}

/// Render projected values as JSON lines
pub fn format_values(values: &[Value]) -> String {
    values
        .iter()
        .map(|value| to_json(value).to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// One line summary of an inference run
pub fn format_stats(stats: &InferenceStats) -> String {
    format!(
        "Merged {} record(s), skipped {}, {} field(s), depth {}",
        stats.records_processed, stats.records_skipped, stats.fields_discovered, stats.max_depth
    )
}

// Numbers go through their textual form so YAML gets plain scalars
fn json_to_yaml(json: &Json) -> Yaml {
    match json {
        Json::Null => Yaml::Null,
        Json::Bool(b) => Yaml::Bool(*b),
        Json::Number(n) => {
            if let Some(u) = n.as_u64() {
                Yaml::Number(u.into())
            } else if let Some(i) = n.as_i64() {
                Yaml::Number(i.into())
            } else if let Some(f) = n.as_f64() {
                Yaml::Number(f.into())
            } else {
                Yaml::String(n.to_string())
            }
        }
        Json::String(s) => Yaml::String(s.clone()),
        Json::Array(items) => Yaml::Sequence(items.iter().map(json_to_yaml).collect()),
        Json::Object(map) => Yaml::Mapping(
            map.iter()
                .map(|(k, v)| (Yaml::String(k.clone()), json_to_yaml(v)))
                .collect(),
        ),
    }
}

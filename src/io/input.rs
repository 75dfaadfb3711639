use anyhow::{Context, Result, bail};
use jsonschema::validator_for;
use schemars::schema_for;
use serde_json::Value;
use tracing::debug;

use crate::domain::RecordDocument;

use super::DocumentFormat;

/// Parse structured data in any supported format into a `serde_json::Value`.
pub fn parse_document_str(contents: &str, format: DocumentFormat) -> Result<Value> {
    match format {
        DocumentFormat::Json => {
            serde_json::from_str::<Value>(contents).with_context(|| "failed to parse JSON document")
        }
        #[cfg(feature = "yaml")]
        DocumentFormat::Yaml => {
            serde_yaml::from_str::<Value>(contents).with_context(|| "failed to parse YAML document")
        }
        #[cfg(feature = "toml")]
        DocumentFormat::Toml => toml::from_str::<toml::Table>(contents)
            .with_context(|| "failed to parse TOML document")
            .and_then(|table| {
                serde_json::to_value(table).context("failed to convert TOML to JSON")
            }),
    }
}

/// JSON Schema accepted by [`load_record_document`].
pub fn record_schema() -> Result<Value> {
    serde_json::to_value(schema_for!(RecordDocument)).context("failed to encode record schema")
}

/// Parse a record document and check it against [`record_schema`].
pub fn load_record_document(contents: &str, format: DocumentFormat) -> Result<RecordDocument> {
    let value = parse_document_str(contents, format)?;
    record_document_from_value(&value)
}

/// Structural check followed by deserialization. Every schema violation is
/// reported with its JSON pointer.
pub fn record_document_from_value(value: &Value) -> Result<RecordDocument> {
    let schema = record_schema()?;
    let validator = validator_for(&schema).context("failed to compile record schema")?;
    let problems: Vec<String> = validator
        .iter_errors(value)
        .map(|error| {
            let pointer = error.instance_path.to_string();
            let prefix = if pointer.is_empty() {
                "<root>".to_string()
            } else {
                pointer
            };
            format!("{prefix}: {error}")
        })
        .collect();
    if !problems.is_empty() {
        debug!(count = problems.len(), "record document rejected by schema");
        bail!("record document is malformed: {}", problems.join("; "));
    }
    serde_json::from_value(value.clone()).context("failed to decode record document")
}

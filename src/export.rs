//! Export a collection and its entries as JSON.
//!
//! The output is a core [`CollectionExport`](wordhoard_core::CollectionExport):
//! every timestamp is an ISO-8601 string with millisecond precision, so
//! the file deserialises back into equal values.

use anyhow::{Context, Result};
use std::path::Path;

use crate::app::open_engine;
use crate::config::Config;

/// Export one collection.
///
/// If `output` is `Some`, writes to that file path. Otherwise writes
/// to stdout for piping.
pub async fn run_export(config: &Config, collection_id: &str, output: Option<&Path>) -> Result<()> {
    let engine = open_engine(config)?;
    let export = engine.export_collection(collection_id).await?;
    let json = serde_json::to_string_pretty(&export)?;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "Exported {} entries from '{}' to {}",
                export.entries.len(),
                export.collection.name,
                path.display()
            );
        }
        None => {
            println!("{}", json);
        }
    }

    Ok(())
}

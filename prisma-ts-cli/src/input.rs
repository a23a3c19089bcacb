//! Loading generator input for the offline subcommands.
//!
//! A DMMF file may hold a full `generate` payload, a DMMF document
//! (`{"datamodel": ...}`) or a bare datamodel (`{"models": ..., "enums": ...}`).

use crate::error::{CliError, CliResult};
use prisma_ts::config::GeneratorOptions;
use prisma_ts::dmmf::Document;
use prisma_ts::Datamodel;
use serde_json::Value;
use std::path::Path;

/// Read and decode a DMMF file.
pub fn load_options(path: &Path) -> CliResult<GeneratorOptions> {
    let content = std::fs::read_to_string(path)?;
    parse_options(&content).map_err(|e| CliError::input(path, e))
}

/// Decode DMMF input in any of the accepted shapes.
pub fn parse_options(content: &str) -> Result<GeneratorOptions, serde_json::Error> {
    let value: Value = serde_json::from_str(content)?;

    if value.get("generator").is_some() || value.get("dmmf").is_some() {
        return serde_json::from_value(value);
    }

    let dmmf = if value.get("datamodel").is_some() {
        serde_json::from_value::<Document>(value)?
    } else {
        Document {
            datamodel: serde_json::from_value::<Datamodel>(value)?,
        }
    };

    Ok(GeneratorOptions {
        dmmf,
        ..Default::default()
    })
}

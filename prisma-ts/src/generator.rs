//! Generation pass.
//!
//! [`manifest`] and [`generate`] are the two hooks a host drives. Both are
//! plain functions; registering them with a host process is left to the
//! binary.

use crate::config::{GeneratorConfig, GeneratorOptions};
use crate::dmmf::Datamodel;
use crate::emitter;
use crate::error::GenerateResult;
use crate::format::Formatter;
use crate::validate::validate_datamodel;
use crate::writer::{FileWriter, WriteResult};
use serde::Serialize;
use std::path::PathBuf;

/// Human-readable generator name shown by the host.
pub const GENERATOR_NAME: &str = "Prisma TypeScript Types";

/// Generator that must run before this one.
pub const REQUIRED_GENERATOR: &str = "prisma-client-js";

/// Static generator metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    /// Display name.
    pub pretty_name: String,

    /// Generators that must have run first.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub requires_generators: Vec<String>,
}

/// Metadata reported to the host.
pub fn manifest() -> Manifest {
    Manifest {
        pretty_name: GENERATOR_NAME.to_string(),
        requires_generators: vec![REQUIRED_GENERATOR.to_string()],
    }
}

/// Formatted output of a pass, not yet written.
#[derive(Debug, Clone)]
pub struct GeneratedOutput {
    /// Destination file.
    pub path: PathBuf,

    /// Complete formatted TypeScript content.
    pub content: String,

    /// Number of interfaces emitted.
    pub models: usize,

    /// Number of enums emitted.
    pub enums: usize,
}

/// TypeScript declaration generator.
#[derive(Debug, Clone)]
pub struct TypesGenerator {
    config: GeneratorConfig,
}

impl TypesGenerator {
    /// Create a generator with resolved configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    /// Validate, emit and format the datamodel. Nothing touches the
    /// filesystem.
    pub fn generate(&self, datamodel: &Datamodel) -> GenerateResult<GeneratedOutput> {
        validate_datamodel(datamodel)?;

        let raw = emitter::render_datamodel(datamodel);
        let content = Formatter::new(self.config.format.clone()).format(&raw)?;

        Ok(GeneratedOutput {
            path: self.config.output_path(),
            content,
            models: datamodel.models.len(),
            enums: datamodel.enums.len(),
        })
    }

    /// Generate and write the output file.
    pub fn write(&self, datamodel: &Datamodel, writer: &FileWriter) -> GenerateResult<WriteResult> {
        let output = self.generate(datamodel)?;
        let result = writer.write(&output.path, &output.content)?;

        tracing::info!(
            path = %output.path.display(),
            bytes = output.content.len(),
            models = output.models,
            enums = output.enums,
            written = result.was_written(),
            "Generated TypeScript types"
        );

        Ok(result)
    }
}

/// Run a full pass for a host `generate` request.
///
/// Configuration is resolved first, so a missing output directory fails
/// before anything is emitted or written.
pub fn generate(options: &GeneratorOptions) -> GenerateResult<WriteResult> {
    let config = GeneratorConfig::from_options(options)?;
    TypesGenerator::new(config).write(&options.dmmf.datamodel, &FileWriter::new(false))
}

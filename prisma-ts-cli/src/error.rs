//! Error types for the CLI.

use prisma_ts::GenerateError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during a generation pass.
    #[error("Failed to generate types: {0}")]
    Generate(#[from] GenerateError),

    /// The DMMF input file could not be decoded.
    #[error("Invalid DMMF input {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Validation failed (output out of date).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Create an input decoding error.
    pub fn input(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Input {
            path: path.into(),
            source,
        }
    }
}

//! Error types for a generation pass.
//!
//! Every failure terminates the pass and is reported once to the caller.
//! Nothing is retried and nothing is written after an error.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generator operations.
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Main error type for a generation pass.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The generator options could not be resolved.
    #[error("Invalid generator configuration: {0}")]
    Config(#[from] ConfigError),

    /// The datamodel cannot be emitted unambiguously.
    #[error("Invalid datamodel: {0}")]
    Validation(#[from] ValidationError),

    /// The emitted text could not be normalized.
    #[error("Failed to format output: {0}")]
    Format(#[from] FormatError),

    /// The output could not be written.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),
}

/// Error resolving generator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No output directory was given.
    #[error("No output directory specified")]
    MissingOutput,

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Duplicate names in the datamodel.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Two models or enums share a name.
    #[error("Duplicate declaration '{name}'")]
    DuplicateDeclaration { name: String },

    /// A model declares the same field twice.
    #[error("Duplicate field '{field}' in model '{model}'")]
    DuplicateField { model: String, field: String },

    /// An enum declares the same value twice.
    #[error("Duplicate value '{value}' in enum '{name}'")]
    DuplicateEnumValue { name: String, value: String },
}

/// Error during the normalization pass.
#[derive(Debug, Error)]
pub enum FormatError {
    /// The TypeScript grammar could not be loaded.
    #[error("Failed to initialize TypeScript parser: {0}")]
    Parser(String),

    /// The emitted text is not valid TypeScript.
    #[error("Syntax error at {line}:{column}: {message}")]
    Syntax {
        line: usize,
        column: usize,
        message: String,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

impl FormatError {
    /// Create a syntax error at a zero-based tree-sitter position.
    pub fn syntax(row: usize, column: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line: row + 1,
            column: column + 1,
            message: message.into(),
        }
    }
}

impl GenerateError {
    /// Whether the pass stopped on missing configuration.
    pub fn is_config_missing(&self) -> bool {
        matches!(self, GenerateError::Config(ConfigError::MissingOutput))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_output_message() {
        let err = GenerateError::from(ConfigError::MissingOutput);
        assert!(err.is_config_missing());
        assert_eq!(
            err.to_string(),
            "Invalid generator configuration: No output directory specified"
        );
    }

    #[test]
    fn test_syntax_position_is_one_based() {
        let err = FormatError::syntax(0, 4, "unexpected token");
        assert_eq!(err.to_string(), "Syntax error at 1:5: unexpected token");
    }

    #[test]
    fn test_write_error_keeps_source() {
        use std::error::Error as _;

        let err = WriteError::WriteFile {
            path: PathBuf::from("/readonly/index.ts"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        assert!(err.source().is_some());
        assert!(err.to_string().contains("/readonly/index.ts"));
    }
}

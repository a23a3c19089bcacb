//! Generator configuration.
//!
//! Everything arrives in the [`GeneratorOptions`] payload the host sends with
//! a `generate` request: the output directory of the `generator` block and
//! its free-form config keys. Command-line arguments of the offline CLI are
//! merged on top and take precedence.

use crate::dmmf::Document;
use crate::error::ConfigError;
use crate::format::{EndOfLine, FormatOptions};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Default output filename.
pub const DEFAULT_FILE_NAME: &str = "index.ts";

/// Payload of a `generate` request.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// The generator block this invocation is for.
    #[serde(default)]
    pub generator: GeneratorInfo,

    /// Resolved datamodel.
    #[serde(default)]
    pub dmmf: Document,
}

/// A `generator` block of the schema.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorInfo {
    /// Block name.
    #[serde(default)]
    pub name: String,

    /// Resolved `output` value.
    #[serde(default)]
    pub output: Option<EnvValue>,

    /// Additional keys of the block. Prisma passes values as strings or
    /// string arrays.
    #[serde(default)]
    pub config: BTreeMap<String, serde_json::Value>,
}

/// A value that may have been read from an environment variable. Prisma
/// resolves the variable before sending the payload.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnvValue {
    /// Resolved value.
    pub value: Option<String>,
}

/// Resolved configuration for one generation pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory the output file is written to.
    pub output_dir: PathBuf,

    /// Output filename.
    pub file_name: String,

    /// Normalization options.
    pub format: FormatOptions,
}

/// CLI arguments that can override the payload.
#[derive(Debug, Default, Clone)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Output filename override.
    pub file_name: Option<String>,

    /// Print width override.
    pub print_width: Option<usize>,
}

impl GeneratorConfig {
    /// Create a configuration with default file name and formatting.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            file_name: DEFAULT_FILE_NAME.to_string(),
            format: FormatOptions::default(),
        }
    }

    /// Resolve configuration from a `generate` payload.
    ///
    /// # Errors
    /// [`ConfigError::MissingOutput`] when the block has no usable output
    /// directory, [`ConfigError::InvalidValue`] for malformed config keys.
    pub fn from_options(options: &GeneratorOptions) -> Result<Self, ConfigError> {
        Self::resolve(options, &CliArgs::default())
    }

    /// Resolve configuration from a payload with CLI overrides applied.
    pub fn resolve(options: &GeneratorOptions, args: &CliArgs) -> Result<Self, ConfigError> {
        let generator = &options.generator;

        let output_dir = args
            .output
            .clone()
            .or_else(|| {
                generator
                    .output
                    .as_ref()
                    .and_then(|o| o.value.as_deref())
                    .map(PathBuf::from)
            })
            .filter(|p| !p.as_os_str().is_empty())
            .ok_or(ConfigError::MissingOutput)?;

        let mut config = Self::new(output_dir);

        for (key, value) in &generator.config {
            match key.as_str() {
                "fileName" => config.file_name = string_value(key, value)?,
                "printWidth" => config.format.print_width = positive_value(key, value)?,
                "tabWidth" => config.format.tab_width = positive_value(key, value)?,
                "endOfLine" => {
                    config.format.end_of_line = string_value(key, value)?
                        .parse::<EndOfLine>()
                        .map_err(|e| ConfigError::invalid_value(key, e))?;
                }
                _ => {
                    tracing::warn!(generator = %generator.name, key = %key, "Ignoring unknown config key");
                }
            }
        }

        if let Some(ref file_name) = args.file_name {
            config.file_name = file_name.clone();
        }
        if let Some(print_width) = args.print_width {
            config.format.print_width = print_width;
        }

        validate_file_name(&config.file_name)?;
        Ok(config)
    }

    /// Path of the output file.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.file_name)
    }
}

fn string_value(key: &str, value: &serde_json::Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| ConfigError::invalid_value(key, format!("expected a string, got {value}")))
}

fn positive_value(key: &str, value: &serde_json::Value) -> Result<usize, ConfigError> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64().map(|n| n as usize),
        serde_json::Value::String(s) => s.trim().parse::<usize>().ok(),
        _ => None,
    };
    match parsed {
        Some(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::invalid_value(
            key,
            format!("expected a positive integer, got {value}"),
        )),
    }
}

fn validate_file_name(file_name: &str) -> Result<(), ConfigError> {
    let is_plain = Path::new(file_name)
        .file_name()
        .is_some_and(|name| name == file_name);
    if is_plain {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            "fileName",
            format!("'{file_name}' is not a plain file name"),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options_with(output: Option<&str>, config: serde_json::Value) -> GeneratorOptions {
        serde_json::from_value(json!({
            "generator": {
                "name": "types",
                "output": output.map(|o| json!({"value": o, "fromEnvVar": null})),
                "config": config,
            },
            "dmmf": {"datamodel": {"models": [], "enums": []}},
        }))
        .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_options(&options_with(Some("./generated"), json!({})))
            .unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./generated"));
        assert_eq!(config.file_name, "index.ts");
        assert_eq!(config.format, FormatOptions::default());
        assert_eq!(config.output_path(), PathBuf::from("./generated/index.ts"));
    }

    #[test]
    fn test_missing_output() {
        let err = GeneratorConfig::from_options(&options_with(None, json!({}))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutput));
    }

    #[test]
    fn test_empty_output_is_missing() {
        let err = GeneratorConfig::from_options(&options_with(Some(""), json!({}))).unwrap_err();
        assert!(matches!(err, ConfigError::MissingOutput));
    }

    #[test]
    fn test_null_output_value_is_missing() {
        let options: GeneratorOptions = serde_json::from_value(json!({
            "generator": {"name": "types", "output": {"value": null, "fromEnvVar": "OUT"}},
        }))
        .unwrap();
        assert!(matches!(
            GeneratorConfig::from_options(&options),
            Err(ConfigError::MissingOutput)
        ));
    }

    #[test]
    fn test_config_keys() {
        let options = options_with(
            Some("out"),
            json!({"fileName": "types.ts", "printWidth": "80", "tabWidth": "4", "endOfLine": "crlf"}),
        );
        let config = GeneratorConfig::from_options(&options).unwrap();
        assert_eq!(config.file_name, "types.ts");
        assert_eq!(config.format.print_width, 80);
        assert_eq!(config.format.tab_width, 4);
        assert_eq!(config.format.end_of_line, EndOfLine::Crlf);
    }

    #[test]
    fn test_invalid_print_width() {
        for bad in [json!("wide"), json!("0"), json!(["80"])] {
            let options = options_with(Some("out"), json!({ "printWidth": bad }));
            let err = GeneratorConfig::from_options(&options).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "printWidth"),
                "{err}"
            );
        }
    }

    #[test]
    fn test_file_name_must_be_plain() {
        let options = options_with(Some("out"), json!({"fileName": "../escape.ts"}));
        assert!(GeneratorConfig::from_options(&options).is_err());
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let options = options_with(Some("out"), json!({"somethingElse": "x"}));
        assert!(GeneratorConfig::from_options(&options).is_ok());
    }

    #[test]
    fn test_cli_args_take_precedence() {
        let options = options_with(Some("out"), json!({"fileName": "types.ts", "printWidth": "80"}));
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            file_name: Some("models.ts".to_string()),
            print_width: Some(120),
        };

        let config = GeneratorConfig::resolve(&options, &args).unwrap();
        assert_eq!(config.output_path(), PathBuf::from("./custom/models.ts"));
        assert_eq!(config.format.print_width, 120);
    }

    #[test]
    fn test_cli_output_fills_missing_payload_output() {
        let args = CliArgs {
            output: Some(PathBuf::from("./custom")),
            ..Default::default()
        };
        let config = GeneratorConfig::resolve(&options_with(None, json!({})), &args).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./custom"));
    }
}

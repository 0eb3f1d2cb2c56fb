//! # Configuration Settings
//!
//! Defines the settings structure for the codec, the validator and logging.

use crate::codec::CodecOptions;
use crate::errors::{MuleConfigError, Result};
use crate::validation::ValidatorOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Prefix of the environment variables read by [`Settings::load`].
pub const ENV_PREFIX: &str = "MULE_CONFIG";

/// Main application settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Settings {
    /// XML codec settings
    #[validate(nested)]
    pub codec: CodecSettings,

    /// Validator settings
    #[validate(nested)]
    pub validation: ValidationSettings,

    /// Logging settings
    #[validate(nested)]
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load settings from an optional file, then `MULE_CONFIG_*` environment
    /// variables (`MULE_CONFIG_CODEC__INDENT=2`), and validate the result.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(MuleConfigError::from)?;
        self.validate_custom()
    }

    fn validate_custom(&self) -> Result<()> {
        if self.logging.level.parse::<tracing_subscriber::EnvFilter>().is_err() {
            return Err(MuleConfigError::config(format!(
                "Invalid log level directive '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// XML codec settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CodecSettings {
    /// Spaces per nesting level when writing
    #[validate(range(max = 8, message = "Indent must be between 0 and 8"))]
    pub indent: usize,

    /// Reject attribute literals outside their type or domain while parsing
    pub strict_values: bool,

    /// Write the XML declaration
    pub emit_declaration: bool,
}

impl Default for CodecSettings {
    fn default() -> Self {
        let options = CodecOptions::default();
        Self {
            indent: options.indent,
            strict_values: options.strict_values,
            emit_declaration: options.emit_declaration,
        }
    }
}

impl From<&CodecSettings> for CodecOptions {
    fn from(settings: &CodecSettings) -> Self {
        Self {
            indent: settings.indent,
            strict_values: settings.strict_values,
            emit_declaration: settings.emit_declaration,
        }
    }
}

/// Validator settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ValidationSettings {
    /// Count warnings as errors
    pub warnings_as_errors: bool,

    /// Report idle limits above active limits in profiles
    pub check_profile_bounds: bool,
}

impl Default for ValidationSettings {
    fn default() -> Self {
        let options = ValidatorOptions::default();
        Self {
            warnings_as_errors: options.warnings_as_errors,
            check_profile_bounds: options.check_profile_bounds,
        }
    }
}

impl From<&ValidationSettings> for ValidatorOptions {
    fn from(settings: &ValidationSettings) -> Self {
        Self {
            warnings_as_errors: settings.warnings_as_errors,
            check_profile_bounds: settings.check_profile_bounds,
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default filter directive, overridden by `RUST_LOG`
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}

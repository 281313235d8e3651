//! Configuration settings for the signing tool.

use serde::Deserialize;
use std::path::Path;

use crate::error::SigningError;
use crate::signature::DEFAULT_NONCE_LENGTH;

/// Main configuration structure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub signing: SigningConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format ("pretty" or "json").
    #[serde(default = "default_log_format")]
    pub format: String,
}

/// Header signing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SigningConfig {
    /// Number of alphanumeric characters in each generated nonce.
    #[serde(default = "default_nonce_length")]
    pub nonce_length: usize,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_nonce_length() -> usize {
    DEFAULT_NONCE_LENGTH
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            nonce_length: default_nonce_length(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SigningError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| SigningError::Config {
            message: format!("Failed to read config file '{}': {}", path.display(), e),
        })?;

        Self::from_toml(&content).map_err(|e| match e {
            SigningError::Config { message } => SigningError::Config {
                message: format!("{} ({})", message, path.display()),
            },
            other => other,
        })
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, SigningError> {
        let settings: Settings = toml::from_str(content).map_err(|e| SigningError::Config {
            message: format!("Failed to parse config: {}", e),
        })?;

        settings.validate()?;

        Ok(settings)
    }

    fn validate(&self) -> Result<(), SigningError> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(SigningError::Config {
                message: format!(
                    "Invalid log level '{}'. Valid levels: {:?}",
                    self.logging.level, valid_levels
                ),
            });
        }

        let valid_formats = ["pretty", "json"];
        if !valid_formats.contains(&self.logging.format.to_lowercase().as_str()) {
            return Err(SigningError::Config {
                message: format!(
                    "Invalid log format '{}'. Valid formats: {:?}",
                    self.logging.format, valid_formats
                ),
            });
        }

        if self.signing.nonce_length == 0 {
            return Err(SigningError::Config {
                message: "Invalid nonce length 0. Must be at least 1".to_string(),
            });
        }

        Ok(())
    }
}

//! Configuration management for bsonconv
//!
//! This module handles loading, parsing, and managing configuration from:
//! - Configuration file (TOML format)
//! - Command-line arguments
//!
//! Configuration precedence (highest to lowest):
//! 1. Command-line arguments
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::bson::DEFAULT_MAX_DEPTH;
use crate::codec::CodecOptions;
use crate::error::{ConfigError, Result};
use crate::extjson::ExtJsonMode;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input limits
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Resource limits applied before and during conversion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    /// Largest input file accepted, in bytes
    #[serde(default = "default_max_input_bytes")]
    pub max_input_bytes: u64,

    /// Maximum nesting of documents and arrays. Values far above the default
    /// need a larger thread stack in debug builds.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

/// JSON output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Extended JSON flavour (relaxed, canonical)
    #[serde(default)]
    pub mode: ExtJsonMode,

    /// Enable colored output when printing JSON to a terminal
    #[serde(default = "default_color_output")]
    pub color_output: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: LogLevel,

    /// Enable timestamps in logs
    #[serde(default = "default_log_timestamps")]
    pub timestamps: bool,
}

/// Log level options
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

// Default value functions
fn default_max_input_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

fn default_color_output() -> bool {
    true
}

fn default_log_level() -> LogLevel {
    LogLevel::Warn
}

fn default_log_timestamps() -> bool {
    false
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_input_bytes: default_max_input_bytes(),
            max_depth: default_max_depth(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            mode: ExtJsonMode::default(),
            color_output: default_color_output(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            timestamps: default_log_timestamps(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the default configuration file path
    ///
    /// # Returns
    /// * `PathBuf` - `~/.bsonconv/config.toml`
    pub fn default_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bsonconv")
            .join("config.toml")
    }

    /// Load configuration from a file
    ///
    /// With no explicit path the default location is used, and a missing
    /// default file yields the defaults. An explicit path must exist.
    ///
    /// # Arguments
    /// * `path` - Optional path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Result<Config>` - Loaded configuration or error
    pub fn load_from_file(path: Option<&Path>) -> Result<Self> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (Self::default_config_path(), false),
        };

        if !path.exists() {
            if explicit {
                return Err(ConfigError::FileNotFound(path.display().to_string()).into());
            }
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::InvalidFormat(e.to_string()).into())
    }

    /// Validate the configuration
    ///
    /// # Returns
    /// * `Result<()>` - Ok if valid, error otherwise
    pub fn validate(&self) -> Result<()> {
        if self.limits.max_input_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_input_bytes".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        if self.limits.max_depth == 0 {
            return Err(ConfigError::InvalidValue {
                field: "limits.max_depth".to_string(),
                value: "0".to_string(),
            }
            .into());
        }

        Ok(())
    }

    /// Codec options derived from this configuration
    pub fn codec_options(&self) -> CodecOptions {
        CodecOptions {
            max_depth: self.limits.max_depth,
            mode: self.output.mode,
        }
    }
}

impl LogLevel {
    /// Convert to tracing::Level
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.limits.max_input_bytes, 10 * 1024 * 1024);
        assert_eq!(config.limits.max_depth, DEFAULT_MAX_DEPTH);
        assert_eq!(config.output.mode, ExtJsonMode::Relaxed);
        assert!(config.output.color_output);
        assert_eq!(config.logging.level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config = Config::from_toml_str(
            r#"
            [output]
            mode = "canonical"
            "#,
        )
        .unwrap();
        assert_eq!(config.output.mode, ExtJsonMode::Canonical);
        assert!(config.output.color_output);
        assert_eq!(config.limits.max_depth, DEFAULT_MAX_DEPTH);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::from_toml_str("[limits\nmax_depth = ").is_err());
        assert!(Config::from_toml_str("[output]\nmode = \"shell\"").is_err());
    }

    #[test]
    fn test_validate_rejects_zero_limits() {
        let mut config = Config::default();
        config.limits.max_depth = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.limits.max_input_bytes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = Config::default();
        config.limits.max_depth = 64;
        config.logging.level = LogLevel::Debug;
        let text = config.to_toml_string().unwrap();
        let back = Config::from_toml_str(&text).unwrap();
        assert_eq!(back.limits.max_depth, 64);
        assert_eq!(back.logging.level, LogLevel::Debug);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[limits]\nmax_input_bytes = 2048").unwrap();
        let config = Config::load_from_file(Some(file.path())).unwrap();
        assert_eq!(config.limits.max_input_bytes, 2048);

        let missing = file.path().with_extension("missing");
        assert!(Config::load_from_file(Some(&missing)).is_err());
    }

    #[test]
    fn test_codec_options() {
        let mut config = Config::default();
        config.limits.max_depth = 7;
        config.output.mode = ExtJsonMode::Canonical;
        let options = config.codec_options();
        assert_eq!(options.max_depth, 7);
        assert_eq!(options.mode, ExtJsonMode::Canonical);
    }
}

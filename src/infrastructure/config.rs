//! Configuration management

use crate::pipeline::DEFAULT_SHEBANG;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Environment variable naming an optional YAML configuration file.
pub const CONFIG_ENV: &str = "YAML2SCRIPT_CONFIG";

/// Errors raised while loading configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The configuration file could not be read
    #[error("Failed to read config '{path}': {message}")]
    Io {
        /// Path of the configuration file.
        path: String,
        /// Underlying I/O error message.
        message: String,
    },

    /// The configuration file is not valid
    #[error("Invalid config '{path}': {message}")]
    Parse {
        /// Path of the configuration file.
        path: String,
        /// Parser error message.
        message: String,
    },
}

/// Application configuration
///
/// Command-line flags take precedence over every value here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// First line of extracted scripts (empty to omit)
    pub shebang: String,
    /// Checker command
    pub check_command: String,
    /// Extra checker parameters
    pub check_parameters: Vec<String>,
    /// Per-invocation checker timeout in seconds
    pub timeout_secs: Option<u64>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shebang: DEFAULT_SHEBANG.to_string(),
            check_command: "shellcheck".to_string(),
            check_parameters: Vec::new(),
            timeout_secs: None,
            log_level: "warn".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from a YAML file; missing keys take defaults
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Loads the file named by `path` if given, defaults otherwise
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a named file cannot be loaded.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        path.map_or_else(|| Ok(Self::default()), Self::load)
    }

    /// Loads the file named by `YAML2SCRIPT_CONFIG`, defaults if unset
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the named file cannot be loaded.
    pub fn from_env() -> Result<Self, ConfigError> {
        let path = std::env::var_os(CONFIG_ENV);
        Self::load_optional(path.as_deref().map(Path::new))
    }

    /// Checker timeout as a duration
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

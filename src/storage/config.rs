//! Configuration handling
//!
//! Configuration is read from `config.toml` in the user's config directory
//! (e.g. `~/.config/taskman/config.toml`) or from an explicit path. Every
//! setting has a default, so a missing file is not an error.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
}

/// Table rendering settings
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct TableConfig {
    /// Minimum width of every text column
    pub min_width: usize,

    /// Cells longer than this are cut and end with `...`
    pub max_width: Option<usize>,
}

/// Settings for one invocation
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// JSON file holding the tasks
    pub data_file: PathBuf,

    /// Default CSV export target
    pub csv_file: PathBuf,

    /// Table rendering
    pub table: TableConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_file: PathBuf::from("tasks.json"),
            csv_file: PathBuf::from("tasks.csv"),
            table: TableConfig::default(),
        }
    }
}

impl Config {
    /// Returns the global config directory
    pub fn global_config_dir() -> Option<PathBuf> {
        ProjectDirs::from("dev", "taskman", "taskman").map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Returns the default config file path
    pub fn default_path() -> Option<PathBuf> {
        Self::global_config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Loads configuration
    ///
    /// An explicit path must exist. Without one, the default location is
    /// used if present, otherwise built-in defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.is_file() {
                return Err(ConfigError::NotFound(path.to_path_buf()).into());
            }
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Loads configuration from a specific file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;

        Self::parse(&content).with_context(|| format!("Failed to load config: {}", path.display()))
    }

    /// Parses and validates TOML configuration
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.data_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("data_file must not be empty".to_string()));
        }
        if self.csv_file.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("csv_file must not be empty".to_string()));
        }
        if let Some(max) = self.table.max_width {
            if max < 4 {
                return Err(ConfigError::Invalid(format!(
                    "table.max_width must be at least 4, got {}",
                    max
                )));
            }
            if max < self.table.min_width {
                return Err(ConfigError::Invalid(
                    "table.max_width must not be smaller than table.min_width".to_string(),
                ));
            }
        }
        Ok(())
    }
}

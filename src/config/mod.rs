//! Configuration management for repojira.
//!
//! Settings are stored as TOML in the platform config directory
//! (`~/.config/repojira/config.toml` on Linux). Set `REPOJIRA_CONFIG_DIR` to
//! use a different directory. Credentials are never written here; they live
//! in the OS keyring.

mod settings;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use settings::Settings;

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "REPOJIRA_CONFIG_DIR";

const APP_DIR: &str = "repojira";
const CONFIG_FILE: &str = "config.toml";
const REGISTRY_FILE: &str = "repositories.json";

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No platform config directory could be determined.
    #[error("Could not determine configuration directory")]
    NoConfigDir,

    /// The config directory could not be created.
    #[error("Failed to create config directory: {0}")]
    CreateDirError(#[source] std::io::Error),

    /// The config file could not be read.
    #[error("Failed to read config file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The config file could not be written.
    #[error("Failed to write config file: {0}")]
    WriteError(#[source] std::io::Error),

    /// The config file is not valid TOML for [`Config`].
    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    /// The config could not be serialized.
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The on-disk configuration file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Application settings.
    pub settings: Settings,
}

impl Config {
    /// Load the configuration from the default location.
    ///
    /// A missing file yields the default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&config_dir()?.join(CONFIG_FILE))
    }

    /// Load the configuration from `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content)?;
        config.settings.validate()?;
        Ok(config)
    }

    /// Save the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&config_dir()?.join(CONFIG_FILE))
    }

    /// Save the configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.settings.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ConfigError::CreateDirError)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Where the repository registry is stored.
    ///
    /// Uses `settings.registry_path` when set, otherwise
    /// `<data dir>/repojira/repositories.json`.
    pub fn registry_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.settings.registry_path {
            return Ok(path.clone());
        }
        let base = dirs::data_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(base.join(APP_DIR).join(REGISTRY_FILE))
    }
}

/// The directory holding `config.toml`.
pub fn config_dir() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    dirs::config_dir()
        .map(|dir| dir.join(APP_DIR))
        .ok_or(ConfigError::NoConfigDir)
}

/// The full path of the config file.
pub fn config_path() -> Result<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE))
}

//! Application settings configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{ConfigError, Result};
use crate::api::client::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_VALIDATION_TIMEOUT_SECS};

/// Upper bound for any single HTTP attempt.
const MAX_TIMEOUT_SECS: u64 = 120;

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Timeout in seconds for each `/myself` probe.
    pub validation_timeout_secs: u64,
    /// Timeout in seconds for each project list or avatar request.
    pub fetch_timeout_secs: u64,
    /// Where the repository registry lives. Defaults to the data directory.
    pub registry_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            validation_timeout_secs: DEFAULT_VALIDATION_TIMEOUT_SECS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            registry_path: None,
        }
    }
}

impl Settings {
    /// Validate the settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` if a timeout is zero or above
    /// two minutes.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("validation_timeout_secs", self.validation_timeout_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
        ] {
            if value == 0 || value > MAX_TIMEOUT_SECS {
                return Err(ConfigError::ValidationError(format!(
                    "{} must be between 1 and {} (got {})",
                    name, MAX_TIMEOUT_SECS, value
                )));
            }
        }
        Ok(())
    }
}

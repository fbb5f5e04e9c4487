//! Centralized error types for repojira.
//!
//! Each module owns a `thiserror` enum; `AppError` aggregates them and maps
//! each case to a message suitable for showing to the user.

use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::credentials::CredentialError;
use crate::registry::RegistryError;

/// The main application error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// Jira API errors.
    #[error("{0}")]
    Api(#[from] ApiError),

    /// Credential storage errors.
    #[error("{0}")]
    Credentials(#[from] CredentialError),

    /// Repository registry errors.
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// IO errors (file system, etc.).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic errors with a message.
    #[error("{0}")]
    Other(String),
}

impl AppError {
    /// Create a generic error.
    pub fn other(msg: impl Into<String>) -> Self {
        AppError::Other(msg.into())
    }

    /// Get a user-friendly message for display.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(e) => match e {
                ConfigError::NoConfigDir => {
                    "Could not find configuration directory. Please check your system settings."
                        .to_string()
                }
                ConfigError::CreateDirError(_) => {
                    "Could not create configuration directory. Check file permissions.".to_string()
                }
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file is readable."
                        .to_string()
                }
                ConfigError::WriteError(_) => {
                    "Could not save configuration. Please check file permissions.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::SerializeError(_) => {
                    "Could not save configuration. Internal error.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            AppError::Api(e) => match e {
                ApiError::InvalidInput(msg) => format!("Please fill in all fields ({}).", msg),
                ApiError::InvalidCredentials => {
                    "Invalid username or password/API token.".to_string()
                }
                ApiError::ServerUnreachable(_) => {
                    "Could not connect to Jira. Please check the server address.".to_string()
                }
                ApiError::ProfileUnavailable => "Jira profile is unavailable.".to_string(),
                ApiError::ProjectFetchFailed => "Could not load Jira projects.".to_string(),
                ApiError::Decode(_) => {
                    "Unexpected response from Jira. Please try again.".to_string()
                }
                ApiError::Network(_) => {
                    "Connection failed. Please check your network connection.".to_string()
                }
                ApiError::UnexpectedStatus { url, status } => {
                    format!("Jira answered HTTP {} for {}.", status, url)
                }
                ApiError::InvalidUrl(url) => format!("Invalid URL: {}", url),
            },
            AppError::Credentials(e) => match e {
                CredentialError::Keyring(_) => {
                    "Could not access secure storage. Please log in again.".to_string()
                }
                CredentialError::Corrupt(_) => {
                    "Stored Jira credentials are unreadable. Please log in again.".to_string()
                }
            },
            AppError::Registry(e) => match e {
                RegistryError::NotFound(id) => format!("Repository {} not found.", id),
                RegistryError::AlreadyExists(path) => {
                    format!("Repository '{}' is already registered.", path)
                }
                RegistryError::EmptyPath => "Please enter a repository path.".to_string(),
                RegistryError::UnsupportedSchema { .. } => {
                    "The repository list was written by a newer version of repojira.".to_string()
                }
                RegistryError::Corrupt(_) | RegistryError::Io(_) => {
                    "Could not read or save the repository list.".to_string()
                }
            },
            AppError::Io(_) => "A file operation failed. Please check file permissions.".to_string(),
            AppError::Other(msg) => msg.clone(),
        }
    }

    /// Check if this error is recoverable by retrying later.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            AppError::Api(ApiError::ServerUnreachable(_))
                | AppError::Api(ApiError::ProfileUnavailable)
                | AppError::Api(ApiError::ProjectFetchFailed)
                | AppError::Api(ApiError::Network(_))
        )
    }

    /// Get a suggested action for the user.
    pub fn suggested_action(&self) -> Option<&'static str> {
        match self {
            AppError::Api(ApiError::InvalidCredentials) => Some(
                "Jira Cloud needs an API token: https://id.atlassian.com/manage-profile/security/api-tokens",
            ),
            AppError::Api(ApiError::ServerUnreachable(_)) | AppError::Api(ApiError::Network(_)) => {
                Some("Check the server address and your network, then run 'repojira login' again.")
            }
            AppError::Credentials(_) => Some("Run 'repojira login' to store new credentials."),
            AppError::Config(ConfigError::ParseError(_))
            | AppError::Config(ConfigError::ValidationError(_)) => {
                Some("Fix or delete the config file shown by 'repojira config'.")
            }
            _ => None,
        }
    }
}

/// Result type for application operations.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_from_api_error() {
        let app_err: AppError = ApiError::InvalidCredentials.into();
        assert!(matches!(app_err, AppError::Api(ApiError::InvalidCredentials)));
    }

    #[test]
    fn test_app_error_from_registry_error() {
        let app_err: AppError = RegistryError::NotFound(3).into();
        assert_eq!(app_err.user_message(), "Repository 3 not found.");
    }

    #[test]
    fn test_user_message_invalid_credentials() {
        let err = AppError::Api(ApiError::InvalidCredentials);
        assert!(err.user_message().contains("Invalid username"));
    }

    #[test]
    fn test_user_message_unreachable() {
        let err = AppError::Api(ApiError::ServerUnreachable("https://x".to_string()));
        assert!(err.user_message().contains("server address"));
    }

    #[test]
    fn test_user_message_invalid_input() {
        let err = AppError::Api(ApiError::InvalidInput("username is empty".to_string()));
        assert_eq!(
            err.user_message(),
            "Please fill in all fields (username is empty)."
        );
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = AppError::Config(ConfigError::ValidationError("bad timeout".to_string()));
        assert!(err.user_message().contains("bad timeout"));
    }

    #[test]
    fn test_is_recoverable() {
        assert!(AppError::Api(ApiError::ProjectFetchFailed).is_recoverable());
        assert!(!AppError::Api(ApiError::InvalidCredentials).is_recoverable());
        assert!(!AppError::Registry(RegistryError::EmptyPath).is_recoverable());
    }

    #[test]
    fn test_suggested_action_invalid_credentials() {
        let err = AppError::Api(ApiError::InvalidCredentials);
        assert!(err.suggested_action().unwrap().contains("api-tokens"));
    }

    #[test]
    fn test_suggested_action_none() {
        assert!(AppError::other("boom").suggested_action().is_none());
        assert_eq!(AppError::other("boom").user_message(), "boom");
    }
}

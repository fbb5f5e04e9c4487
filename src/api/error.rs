//! API error types for the Jira integration layer.

use thiserror::Error;

/// Errors that can occur when talking to a Jira server.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A required input field was empty.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The server rejected the credentials with 401.
    #[error("Authentication failed: check your username and password or API token")]
    InvalidCredentials,

    /// No API generation answered successfully for reasons other than auth.
    #[error("Could not reach Jira at {0}")]
    ServerUnreachable(String),

    /// The current user's profile could not be fetched from any API generation.
    #[error("Jira profile is unavailable")]
    ProfileUnavailable,

    /// The project list could not be fetched from any API generation.
    #[error("Failed to fetch Jira projects")]
    ProjectFetchFailed,

    /// A 200 response carried a body that does not match the expected shape.
    #[error("Invalid API response: {0}")]
    Decode(String),

    /// The HTTP client could not be built or a request could not be sent.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A direct download answered with something other than 200.
    #[error("{url} returned HTTP {status}")]
    UnexpectedStatus { url: String, status: u16 },

    /// An avatar or server URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

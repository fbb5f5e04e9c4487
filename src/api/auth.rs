//! Authentication handling for the Jira API.
//!
//! Jira Cloud and Server/DC both accept Basic Auth (username or email plus a
//! password or API token). The credential record is passed into every client
//! call explicitly; nothing here holds process-wide state.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// The validated connection details for a single Jira account.
///
/// A `Credentials` value is only produced by [`JiraClient::validate_credentials`]
/// or loaded back from a credential store that received one, so all three
/// fields are always populated and the server address is normalized.
///
/// [`JiraClient::validate_credentials`]: super::JiraClient::validate_credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    /// Normalized base URL, e.g. `https://company.atlassian.net`.
    pub server: String,
    /// Username or account email.
    pub username: String,
    /// Password or API token.
    pub secret: String,
}

impl Credentials {
    /// Build a credential record, normalizing the server address.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` if any field is empty.
    pub fn new(server: &str, username: &str, secret: &str) -> Result<Self> {
        let server = normalize_server(server)?;
        if username.trim().is_empty() {
            return Err(ApiError::InvalidInput("username is empty".to_string()));
        }
        if secret.is_empty() {
            return Err(ApiError::InvalidInput("password or API token is empty".to_string()));
        }

        Ok(Self {
            server,
            username: username.trim().to_string(),
            secret: secret.to_string(),
        })
    }

    /// Whether every field carries a value.
    ///
    /// Records read back from storage written by older versions may be blank.
    pub fn is_complete(&self) -> bool {
        !self.server.is_empty() && !self.username.is_empty() && !self.secret.is_empty()
    }

    /// The Basic Auth header for these credentials.
    pub fn auth(&self) -> Auth {
        Auth::new(&self.username, &self.secret)
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("server", &self.server)
            .field("username", &self.username)
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// An encoded Basic Auth header.
#[derive(Debug, Clone)]
pub struct Auth {
    /// The username the header was built for.
    username: String,
    /// The complete `Basic ...` header value.
    auth_header: String,
}

impl Auth {
    /// Create the header from username and secret.
    ///
    /// The secret is immediately encoded and not stored.
    pub fn new(username: &str, secret: &str) -> Self {
        Self {
            username: username.to_string(),
            auth_header: build_auth_header(username, secret),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// Get the username.
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Encode "username:secret" in Base64 and prepend "Basic ".
fn build_auth_header(username: &str, secret: &str) -> String {
    let credentials = format!("{}:{}", username, secret);
    let encoded = BASE64.encode(credentials.as_bytes());
    format!("Basic {}", encoded)
}

/// Normalize a user-entered server address.
///
/// Trims whitespace, defaults the scheme to `https://` and strips trailing
/// slashes. Paths are preserved so context-path Server installs keep working.
///
/// # Errors
///
/// Returns `ApiError::InvalidInput` for an empty or whitespace-only address.
pub fn normalize_server(server: &str) -> Result<String> {
    let trimmed = server.trim();
    if trimmed.is_empty() {
        return Err(ApiError::InvalidInput("server address is empty".to_string()));
    }

    let with_scheme = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    Ok(with_scheme.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_auth_header() {
        let header = build_auth_header("user@example.com", "api_token_here");
        assert!(header.starts_with("Basic "));

        let encoded = header.strip_prefix("Basic ").unwrap();
        let decoded = BASE64.decode(encoded).unwrap();
        let decoded_str = String::from_utf8(decoded).unwrap();
        assert_eq!(decoded_str, "user@example.com:api_token_here");
    }

    #[test]
    fn test_auth_new() {
        let auth = Auth::new("jdoe", "secret_token");
        assert_eq!(auth.username(), "jdoe");
        assert_eq!(auth.header_value(), "Basic amRvZTpzZWNyZXRfdG9rZW4=");
    }

    #[test]
    fn test_auth_does_not_expose_secret() {
        let auth = Auth::new("user@example.com", "secret_token");
        let debug_output = format!("{:?}", auth);
        assert!(!debug_output.contains("secret_token"));
    }

    #[test]
    fn test_credentials_debug_redacts_secret() {
        let creds = Credentials::new("jira.example.com", "jdoe", "hunter2").unwrap();
        let debug_output = format!("{:?}", creds);
        assert!(!debug_output.contains("hunter2"));
        assert!(debug_output.contains("<redacted>"));
        assert!(debug_output.contains("https://jira.example.com"));
    }

    #[test]
    fn test_normalize_adds_https_scheme() {
        assert_eq!(
            normalize_server("company.atlassian.net").unwrap(),
            "https://company.atlassian.net"
        );
    }

    #[test]
    fn test_normalize_keeps_http_scheme() {
        assert_eq!(
            normalize_server("http://localhost:8080").unwrap(),
            "http://localhost:8080"
        );
    }

    #[test]
    fn test_normalize_strips_trailing_slashes() {
        assert_eq!(
            normalize_server("https://company.atlassian.net///").unwrap(),
            "https://company.atlassian.net"
        );
        assert_eq!(
            normalize_server("jira.internal/jira/").unwrap(),
            "https://jira.internal/jira"
        );
    }

    #[test]
    fn test_normalize_trims_whitespace() {
        assert_eq!(
            normalize_server("  https://jira.example.com/ \n").unwrap(),
            "https://jira.example.com"
        );
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(matches!(normalize_server(""), Err(ApiError::InvalidInput(_))));
        assert!(matches!(normalize_server("   \t"), Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_credentials_reject_empty_fields() {
        assert!(matches!(
            Credentials::new("jira.example.com", "", "secret"),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            Credentials::new("jira.example.com", "jdoe", ""),
            Err(ApiError::InvalidInput(_))
        ));
        assert!(matches!(
            Credentials::new(" ", "jdoe", "secret"),
            Err(ApiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_credentials_is_complete() {
        let creds = Credentials::new("jira.example.com", "jdoe", "secret").unwrap();
        assert!(creds.is_complete());

        let blank = Credentials {
            server: String::new(),
            username: "jdoe".to_string(),
            secret: "secret".to_string(),
        };
        assert!(!blank.is_complete());
    }
}

//! Authenticated avatar downloads.
//!
//! Jira avatars for projects and users are often behind authentication (always
//! on Server/DC, sometimes on Cloud), so a plain `<img src>` cannot show them.
//! The image is downloaded with the account's credentials and returned as an
//! inline data URI instead.
//!
//! Avatars are optional decoration. Every failure yields `None` and is only
//! logged.

use std::fmt;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use reqwest::{header, StatusCode, Url};
use tracing::debug;

use super::auth::Credentials;
use super::client::JiraClient;
use super::error::{ApiError, Result};

/// MIME type assumed when the server does not send a content type.
const DEFAULT_AVATAR_MIME: &str = "image/png";

/// A downloaded avatar image.
#[derive(Clone, PartialEq, Eq)]
pub struct AvatarImage {
    /// The MIME type reported by the server.
    pub mime_type: String,
    /// The raw image bytes.
    pub bytes: Vec<u8>,
}

impl AvatarImage {
    /// Render as `data:<mime>;base64,<payload>`.
    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, BASE64.encode(&self.bytes))
    }
}

impl fmt::Debug for AvatarImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AvatarImage")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl JiraClient {
    /// Download an avatar with the account's credentials.
    ///
    /// Server-relative URLs (starting with `/`) are resolved against the
    /// configured server. Returns `None` for an empty URL without making a
    /// request, and for any download failure.
    pub async fn fetch_avatar(
        &self,
        credentials: &Credentials,
        avatar_url: &str,
    ) -> Option<AvatarImage> {
        if avatar_url.is_empty() {
            return None;
        }

        match self.try_fetch_avatar(credentials, avatar_url).await {
            Ok(image) => Some(image),
            Err(e) => {
                debug!(url = %avatar_url, "Avatar unavailable: {}", e);
                None
            }
        }
    }

    async fn try_fetch_avatar(
        &self,
        credentials: &Credentials,
        avatar_url: &str,
    ) -> Result<AvatarImage> {
        let url = resolve_avatar_url(&credentials.server, avatar_url)?;

        // Server/DC builds absolute avatar URLs from its own base URL, which
        // may differ from the address the user logged in with.
        let response = self
            .http()
            .get(url.clone())
            .header(header::AUTHORIZATION, credentials.auth().header_value())
            .timeout(self.fetch_timeout())
            .send()
            .await?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(ApiError::UnexpectedStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let mime_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_AVATAR_MIME)
            .to_string();
        let bytes = response.bytes().await?.to_vec();

        debug!(url = %url, mime_type = %mime_type, len = bytes.len(), "Fetched avatar");
        Ok(AvatarImage { mime_type, bytes })
    }
}

/// Turn an avatar URL from the API into an absolute URL.
fn resolve_avatar_url(server: &str, avatar_url: &str) -> Result<Url> {
    let absolute = if avatar_url.starts_with('/') {
        format!("{}{}", server, avatar_url)
    } else {
        avatar_url.to_string()
    };

    Url::parse(&absolute).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", absolute, e)))
}

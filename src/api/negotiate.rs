//! Endpoint negotiation between Jira API generations.
//!
//! Jira Cloud serves REST v3 and Jira Server/Data Center serves REST v2, with
//! different paths and sometimes different response shapes. An operation is
//! described by an ordered list of [`Endpoint`]s, Cloud first. The negotiator
//! walks the list until one candidate answers 200 with a body the caller can
//! decode.
//!
//! A 401 ends negotiation immediately: credentials that one generation rejects
//! will not become valid on the other. Every other failure (non-200 status,
//! timeout, connection error) only means "this generation is not available
//! here" and moves on to the next candidate.

use std::fmt;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use tracing::{debug, warn};

use super::auth::Auth;
use super::error::{ApiError, Result};

/// A Jira REST API generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiGeneration {
    /// Jira Cloud, REST v3.
    Cloud,
    /// Jira Server / Data Center, REST v2.
    Server,
}

impl fmt::Display for ApiGeneration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiGeneration::Cloud => write!(f, "cloud (v3)"),
            ApiGeneration::Server => write!(f, "server (v2)"),
        }
    }
}

/// One candidate path for an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// The API generation that serves this path.
    pub generation: ApiGeneration,
    /// Path relative to the server base URL.
    pub path: &'static str,
}

impl Endpoint {
    const fn cloud(path: &'static str) -> Self {
        Self {
            generation: ApiGeneration::Cloud,
            path,
        }
    }

    const fn server(path: &'static str) -> Self {
        Self {
            generation: ApiGeneration::Server,
            path,
        }
    }
}

/// Current user endpoints.
pub const MYSELF: [Endpoint; 2] = [
    Endpoint::cloud("/rest/api/3/myself"),
    Endpoint::server("/rest/api/2/myself"),
];

/// Project listing endpoints.
pub const PROJECTS: [Endpoint; 2] = [
    Endpoint::cloud("/rest/api/3/project/search"),
    Endpoint::server("/rest/api/2/project"),
];

/// What to do when a 200 body fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePolicy {
    /// Stop and return `ApiError::Decode`.
    Fail,
    /// Treat the generation as unsupported and try the next candidate.
    NextCandidate,
}

/// Outcome of a single HTTP attempt.
#[derive(Debug)]
enum Attempt {
    /// 200 with the full body.
    Accepted(Vec<u8>),
    /// 401 from the server.
    Unauthorized,
    /// Anything else; the reason is only logged.
    Unsupported(String),
}

/// Runs one negotiated operation against a server.
#[derive(Debug)]
pub struct Negotiator<'a> {
    http: &'a Client,
    base_url: &'a str,
    auth: &'a Auth,
    timeout: Duration,
}

impl<'a> Negotiator<'a> {
    /// Create a negotiator for `base_url` with a per-attempt timeout.
    pub fn new(http: &'a Client, base_url: &'a str, auth: &'a Auth, timeout: Duration) -> Self {
        Self {
            http,
            base_url,
            auth,
            timeout,
        }
    }

    /// Try `endpoints` in order and decode the first accepted body.
    ///
    /// `decode` receives the generation that answered so it can pick the
    /// matching response shape.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidCredentials` as soon as any candidate returns 401
    /// - `ApiError::Decode` if a body fails to decode under `DecodePolicy::Fail`
    /// - `ApiError::ServerUnreachable` once every candidate has been tried
    pub async fn negotiate<T, F>(
        &self,
        endpoints: &[Endpoint],
        policy: DecodePolicy,
        mut decode: F,
    ) -> Result<T>
    where
        F: FnMut(ApiGeneration, &[u8]) -> std::result::Result<T, serde_json::Error>,
    {
        for endpoint in endpoints {
            let url = format!("{}{}", self.base_url, endpoint.path);

            let body = match self.attempt(&url).await {
                Attempt::Accepted(body) => body,
                Attempt::Unauthorized => {
                    debug!(generation = %endpoint.generation, url = %url, "Credentials rejected");
                    return Err(ApiError::InvalidCredentials);
                }
                Attempt::Unsupported(reason) => {
                    debug!(
                        generation = %endpoint.generation,
                        url = %url,
                        reason = %reason,
                        "Endpoint unavailable, trying next candidate"
                    );
                    continue;
                }
            };

            match decode(endpoint.generation, &body) {
                Ok(value) => {
                    debug!(generation = %endpoint.generation, url = %url, "Endpoint accepted");
                    return Ok(value);
                }
                Err(e) if policy == DecodePolicy::NextCandidate => {
                    warn!(
                        generation = %endpoint.generation,
                        url = %url,
                        "Unexpected response shape, trying next candidate: {}",
                        e
                    );
                }
                Err(e) => {
                    return Err(ApiError::Decode(format!("{}: {}", url, e)));
                }
            }
        }

        Err(ApiError::ServerUnreachable(self.base_url.to_string()))
    }

    /// Perform a single authenticated GET.
    async fn attempt(&self, url: &str) -> Attempt {
        let response = match self
            .http
            .get(url)
            .header(header::AUTHORIZATION, self.auth.header_value())
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => return Attempt::Unsupported("timed out".to_string()),
            Err(e) => return Attempt::Unsupported(e.to_string()),
        };

        match response.status() {
            StatusCode::OK => match response.bytes().await {
                Ok(bytes) => Attempt::Accepted(bytes.to_vec()),
                Err(e) => Attempt::Unsupported(format!("failed to read body: {}", e)),
            },
            StatusCode::UNAUTHORIZED => Attempt::Unauthorized,
            status => Attempt::Unsupported(format!("HTTP {}", status)),
        }
    }
}

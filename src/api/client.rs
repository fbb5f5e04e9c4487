//! Jira API client implementation.
//!
//! The client is stateless with respect to accounts: every operation takes
//! the credential record it should use. Each operation is a negotiated
//! request over at most two API generations, with no caching and no retries.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument, warn};

use super::auth::Credentials;
use super::error::{ApiError, Result};
use super::negotiate::{self, ApiGeneration, DecodePolicy, Negotiator};
use super::types::{CloudProjectPage, Myself, Profile, Project, ServerProjectList};
use crate::config::Settings;

/// Default timeout for credential probes and profile requests.
pub const DEFAULT_VALIDATION_TIMEOUT_SECS: u64 = 10;

/// Default timeout for project listing and avatar downloads.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 15;

/// The Jira API client.
#[derive(Debug, Clone)]
pub struct JiraClient {
    /// The HTTP client.
    http: Client,
    /// Per-attempt timeout for `/myself` probes.
    validation_timeout: Duration,
    /// Per-attempt timeout for project lists and avatars.
    fetch_timeout: Duration,
}

impl JiraClient {
    /// Create a client using the timeouts from `settings`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_timeouts(
            Duration::from_secs(settings.validation_timeout_secs),
            Duration::from_secs(settings.fetch_timeout_secs),
        )
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(validation_timeout: Duration, fetch_timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("repojira/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Network)?;

        Ok(Self {
            http,
            validation_timeout,
            fetch_timeout,
        })
    }

    /// Check credentials against the server and return the normalized record.
    ///
    /// Probes `/rest/api/3/myself`, then `/rest/api/2/myself`. The response
    /// body is not inspected; a 200 from either generation is enough.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidInput` if a field is empty
    /// - `ApiError::InvalidCredentials` if the server answers 401
    /// - `ApiError::ServerUnreachable` if neither generation answers 200
    #[instrument(skip(self, secret))]
    pub async fn validate_credentials(
        &self,
        server: &str,
        username: &str,
        secret: &str,
    ) -> Result<Credentials> {
        let credentials = Credentials::new(server, username, secret)?;
        debug!(server = %credentials.server, "Validating Jira credentials");

        let auth = credentials.auth();
        let negotiator = Negotiator::new(
            &self.http,
            &credentials.server,
            &auth,
            self.validation_timeout,
        );
        let generation = negotiator
            .negotiate(&negotiate::MYSELF, DecodePolicy::Fail, |generation, _| {
                Ok(generation)
            })
            .await?;

        info!(server = %credentials.server, %generation, "Jira credentials validated");
        Ok(credentials)
    }

    /// List all projects visible to the account.
    ///
    /// Tries the Cloud paginated search first and falls back to the Server/DC
    /// flat list. A body that does not decode on one generation does not stop
    /// the other from being tried. Only the first Cloud page is read.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidCredentials` if the server answers 401
    /// - `ApiError::ProjectFetchFailed` if neither generation yields a list
    #[instrument(skip(self, credentials), fields(server = %credentials.server))]
    pub async fn list_projects(&self, credentials: &Credentials) -> Result<Vec<Project>> {
        let auth = credentials.auth();
        let negotiator =
            Negotiator::new(&self.http, &credentials.server, &auth, self.fetch_timeout);

        let projects = negotiator
            .negotiate(
                &negotiate::PROJECTS,
                DecodePolicy::NextCandidate,
                |generation, body| decode_projects(generation, body),
            )
            .await
            .map_err(|e| match e {
                ApiError::ServerUnreachable(_) => ApiError::ProjectFetchFailed,
                other => other,
            })?;

        debug!(count = projects.len(), "Fetched Jira projects");
        Ok(projects)
    }

    /// Get the authenticated user's display name and avatar.
    ///
    /// # Errors
    ///
    /// - `ApiError::InvalidCredentials` if the server answers 401
    /// - `ApiError::Decode` if a 200 body is not a user object
    /// - `ApiError::ProfileUnavailable` if neither generation answers 200
    #[instrument(skip(self, credentials), fields(server = %credentials.server))]
    pub async fn get_profile(&self, credentials: &Credentials) -> Result<Profile> {
        let auth = credentials.auth();
        let negotiator = Negotiator::new(
            &self.http,
            &credentials.server,
            &auth,
            self.validation_timeout,
        );

        let myself: Myself = negotiator
            .negotiate(&negotiate::MYSELF, DecodePolicy::Fail, |_, body| {
                serde_json::from_slice(body)
            })
            .await
            .map_err(|e| match e {
                ApiError::ServerUnreachable(_) => ApiError::ProfileUnavailable,
                other => other,
            })?;

        Ok(Profile::from(myself))
    }

    /// The underlying HTTP client.
    pub(super) fn http(&self) -> &Client {
        &self.http
    }

    /// Per-attempt timeout for downloads.
    pub(super) fn fetch_timeout(&self) -> Duration {
        self.fetch_timeout
    }
}

/// Decode a project list in the shape the given generation returns.
fn decode_projects(
    generation: ApiGeneration,
    body: &[u8],
) -> std::result::Result<Vec<Project>, serde_json::Error> {
    match generation {
        ApiGeneration::Cloud => {
            let page: CloudProjectPage = serde_json::from_slice(body)?;
            if page.is_last == Some(false) {
                warn!(
                    returned = page.values.len(),
                    total = ?page.total,
                    "Project search returned a partial page"
                );
            }
            Ok(page.into())
        }
        ApiGeneration::Server => {
            let list: ServerProjectList = serde_json::from_slice(body)?;
            Ok(list.into())
        }
    }
}

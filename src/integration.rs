//! The inbound interface used by front ends.
//!
//! `Integration` loads the credential record at the start of every call and
//! passes it into the client. Read paths never validate implicitly: with no
//! stored credentials, project and avatar lookups return empty results
//! without touching the network.

use tracing::{info, instrument, warn};

use crate::api::{AvatarImage, Credentials, JiraClient, Profile, Project};
use crate::credentials::CredentialStore;
use crate::error::Result;
use crate::registry::{ProjectLink, Repository, RepositoryRegistry};

/// Jira integration facade.
pub struct Integration<S> {
    client: JiraClient,
    store: S,
    registry: RepositoryRegistry,
}

impl<S: CredentialStore> Integration<S> {
    /// Assemble the facade from its collaborators.
    pub fn new(client: JiraClient, store: S, registry: RepositoryRegistry) -> Self {
        Self {
            client,
            store,
            registry,
        }
    }

    /// Validate credentials against the server and store them on success.
    ///
    /// Nothing is stored when validation fails.
    pub async fn validate_and_save_credentials(
        &self,
        server: &str,
        username: &str,
        secret: &str,
    ) -> Result<Credentials> {
        let credentials = self
            .client
            .validate_credentials(server, username, secret)
            .await?;
        self.store.save(&credentials)?;
        info!(server = %credentials.server, "Saved Jira credentials");
        Ok(credentials)
    }

    /// Remove the stored credentials.
    pub fn clear_credentials(&self) -> Result<()> {
        self.store.clear()?;
        info!("Cleared Jira credentials");
        Ok(())
    }

    /// The stored credentials, if any.
    ///
    /// A store that cannot be read counts as unconfigured.
    pub fn credentials(&self) -> Option<Credentials> {
        match self.store.load() {
            Ok(credentials) => credentials,
            Err(e) => {
                warn!("Could not load Jira credentials: {}", e);
                None
            }
        }
    }

    /// All projects visible to the stored account.
    ///
    /// Returns an empty list when unconfigured or when Jira cannot be reached.
    pub async fn projects(&self) -> Vec<Project> {
        let Some(credentials) = self.credentials() else {
            return Vec::new();
        };

        match self.client.list_projects(&credentials).await {
            Ok(projects) => projects,
            Err(e) => {
                warn!("Failed to fetch Jira projects: {}", e);
                Vec::new()
            }
        }
    }

    /// The stored account's profile, or `None` when unconfigured.
    pub async fn profile(&self) -> Result<Option<Profile>> {
        let Some(credentials) = self.credentials() else {
            return Ok(None);
        };
        let profile = self.client.get_profile(&credentials).await?;
        Ok(Some(profile))
    }

    /// Find a project by key, ignoring case.
    ///
    /// Fetches the full project list and scans it; project lists are small and
    /// lookups only happen when linking. An empty key returns `None` without
    /// any request.
    #[instrument(skip(self))]
    pub async fn resolve_project_by_key(&self, key: &str) -> Option<Project> {
        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        let project = self
            .projects()
            .await
            .into_iter()
            .find(|project| project.has_key(key));
        if project.is_none() {
            warn!("No Jira project with key {}", key);
        }
        project
    }

    /// Download an avatar with the stored credentials.
    pub async fn avatar(&self, avatar_url: &str) -> Option<AvatarImage> {
        if avatar_url.is_empty() {
            return None;
        }
        let credentials = self.credentials()?;
        self.client.fetch_avatar(&credentials, avatar_url).await
    }

    /// Download the avatar of the project with `key`.
    pub async fn project_avatar(&self, key: &str) -> Option<AvatarImage> {
        let project = self.resolve_project_by_key(key).await?;
        self.avatar(&project.avatar_url).await
    }

    /// Registered repositories with their stored project links.
    pub fn repositories(&self) -> &[Repository] {
        self.registry.repositories()
    }

    /// Register a repository, linking it to `project_key` when it resolves.
    ///
    /// An unknown or empty key registers the repository without a link.
    pub async fn add_repository(&mut self, path: &str, project_key: &str) -> Result<Repository> {
        let link = self.resolve_link(project_key).await;
        Ok(self.registry.add(path, link)?)
    }

    /// Re-link a repository. An empty or unknown key clears the link.
    pub async fn link_repository(&mut self, id: u64, project_key: &str) -> Result<Repository> {
        let link = self.resolve_link(project_key).await;
        Ok(self.registry.set_link(id, link)?.clone())
    }

    /// Remove a repository from the registry.
    pub fn remove_repository(&mut self, id: u64) -> Result<Repository> {
        Ok(self.registry.remove(id)?)
    }

    async fn resolve_link(&self, project_key: &str) -> Option<ProjectLink> {
        self.resolve_project_by_key(project_key)
            .await
            .map(ProjectLink::from)
    }
}

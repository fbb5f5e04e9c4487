//! Registry of local repositories and their linked Jira projects.
//!
//! The registry is a single JSON document. Each repository carries a
//! denormalized copy of its project's key, name and avatar URL so listing
//! repositories never needs the network.
//!
//! The document records a `schema_version`. Version 1 files predate project
//! links and are upgraded on open; files from a newer version are refused
//! rather than partially read.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::api::Project;

/// The schema version written by this build.
pub const SCHEMA_VERSION: u32 = 2;

/// Errors from the repository registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The registry file could not be read or written.
    #[error("Registry IO error: {0}")]
    Io(#[from] io::Error),

    /// The registry file is not valid JSON for the registry schema.
    #[error("Registry file is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The file was written by a newer version.
    #[error("Registry schema version {found} is newer than supported version {supported}")]
    UnsupportedSchema { found: u32, supported: u32 },

    /// No repository with this id.
    #[error("Repository {0} not found")]
    NotFound(u64),

    /// The path is already registered.
    #[error("Repository '{0}' is already registered")]
    AlreadyExists(String),

    /// The repository path is empty.
    #[error("Repository path is empty")]
    EmptyPath,
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;

/// The Jira project a repository is linked to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectLink {
    /// Project key.
    pub key: String,
    /// Project display name at link time.
    pub name: String,
    /// Project avatar URL at link time; may be empty.
    pub avatar_url: String,
}

impl From<Project> for ProjectLink {
    fn from(project: Project) -> Self {
        Self {
            key: project.key,
            name: project.name,
            avatar_url: project.avatar_url,
        }
    }
}

/// A registered local repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Stable identifier, never reused.
    pub id: u64,
    /// Display name, derived from the path.
    pub name: String,
    /// Local path as entered.
    pub path: String,
    /// The linked Jira project, if any.
    #[serde(default)]
    pub jira: Option<ProjectLink>,
}

/// On-disk shape of the registry.
#[derive(Debug, Serialize, Deserialize)]
struct RegistryDocument {
    #[serde(default = "legacy_schema_version")]
    schema_version: u32,
    #[serde(default)]
    next_id: u64,
    #[serde(default)]
    repositories: Vec<Repository>,
}

fn legacy_schema_version() -> u32 {
    1
}

/// File-backed repository registry.
#[derive(Debug)]
pub struct RepositoryRegistry {
    path: PathBuf,
    next_id: u64,
    repositories: Vec<Repository>,
}

impl RepositoryRegistry {
    /// Open the registry at `path`, starting empty if the file does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read, is corrupt, or has a newer schema.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.exists() {
            debug!(path = %path.display(), "No registry file, starting empty");
            return Ok(Self {
                path,
                next_id: 1,
                repositories: Vec::new(),
            });
        }

        let content = fs::read_to_string(&path)?;
        let document: RegistryDocument = serde_json::from_str(&content)?;

        if document.schema_version > SCHEMA_VERSION {
            return Err(RegistryError::UnsupportedSchema {
                found: document.schema_version,
                supported: SCHEMA_VERSION,
            });
        }

        let max_id = document.repositories.iter().map(|r| r.id).max().unwrap_or(0);
        let registry = Self {
            path,
            next_id: document.next_id.max(max_id + 1),
            repositories: document.repositories,
        };

        if document.schema_version < SCHEMA_VERSION {
            info!(
                from = document.schema_version,
                to = SCHEMA_VERSION,
                "Upgrading registry schema"
            );
            registry.persist()?;
        }

        Ok(registry)
    }

    /// The file backing this registry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All registered repositories in insertion order.
    pub fn repositories(&self) -> &[Repository] {
        &self.repositories
    }

    /// Look up a repository by id.
    pub fn get(&self, id: u64) -> Option<&Repository> {
        self.repositories.iter().find(|r| r.id == id)
    }

    /// Register a repository and persist the registry.
    pub fn add(&mut self, path: &str, jira: Option<ProjectLink>) -> Result<Repository> {
        let path = path.trim();
        if path.is_empty() {
            return Err(RegistryError::EmptyPath);
        }
        if self.repositories.iter().any(|r| r.path == path) {
            return Err(RegistryError::AlreadyExists(path.to_string()));
        }

        let repository = Repository {
            id: self.next_id,
            name: display_name(path),
            path: path.to_string(),
            jira,
        };
        let mut repositories = self.repositories.clone();
        repositories.push(repository.clone());
        self.commit(self.next_id + 1, repositories)?;

        info!(id = repository.id, path = %repository.path, "Registered repository");
        Ok(repository)
    }

    /// Replace a repository's project link and persist the registry.
    pub fn set_link(&mut self, id: u64, jira: Option<ProjectLink>) -> Result<&Repository> {
        let index = self
            .repositories
            .iter()
            .position(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let mut repositories = self.repositories.clone();
        repositories[index].jira = jira;
        self.commit(self.next_id, repositories)?;
        Ok(&self.repositories[index])
    }

    /// Remove a repository and persist the registry.
    pub fn remove(&mut self, id: u64) -> Result<Repository> {
        let index = self
            .repositories
            .iter()
            .position(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let mut repositories = self.repositories.clone();
        let removed = repositories.remove(index);
        self.commit(self.next_id, repositories)?;

        info!(id, path = %removed.path, "Removed repository");
        Ok(removed)
    }

    /// Persist a new state and adopt it only once it is on disk.
    fn commit(&mut self, next_id: u64, repositories: Vec<Repository>) -> Result<()> {
        let document = RegistryDocument {
            schema_version: SCHEMA_VERSION,
            next_id,
            repositories,
        };
        self.write(&document)?;
        self.next_id = document.next_id;
        self.repositories = document.repositories;
        Ok(())
    }

    /// Write the current state back to disk.
    fn persist(&self) -> Result<()> {
        self.write(&RegistryDocument {
            schema_version: SCHEMA_VERSION,
            next_id: self.next_id,
            repositories: self.repositories.clone(),
        })
    }

    /// Write a document through a temporary file and rename it into place.
    fn write(&self, document: &RegistryDocument) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(document)?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Derive a display name from the final path component.
fn display_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string())
}

//! Storage for the single Jira credential record.
//!
//! The record is saved only after it has been validated against the server,
//! so a stored record is always complete. The OS keyring keeps it as a JSON
//! payload under one entry; the in-memory store serves tests and embedders
//! that manage persistence themselves.

use std::sync::Mutex;

use thiserror::Error;
use tracing::{debug, warn};

use crate::api::Credentials;

/// The keyring service name for repojira.
const KEYRING_SERVICE: &str = "repojira";

/// The keyring account holding the credential record.
const KEYRING_ACCOUNT: &str = "credentials";

/// Errors from a credential store.
#[derive(Debug, Error)]
pub enum CredentialError {
    /// The OS keyring could not be accessed.
    #[error("Keyring error: {0}")]
    Keyring(String),

    /// The stored record could not be encoded or decoded.
    #[error("Stored credentials are corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Result type for credential store operations.
pub type Result<T> = std::result::Result<T, CredentialError>;

/// Holds at most one credential record.
pub trait CredentialStore: Send + Sync {
    /// Load the record, or `None` if nothing usable is stored.
    fn load(&self) -> Result<Option<Credentials>>;

    /// Store `credentials`, replacing any previous record.
    fn save(&self, credentials: &Credentials) -> Result<()>;

    /// Remove the record. Clearing an empty store is not an error.
    fn clear(&self) -> Result<()>;
}

/// Credential store backed by the OS keyring.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    service: String,
}

impl KeyringCredentialStore {
    /// Create a store using the default keyring service.
    pub fn new() -> Self {
        Self::with_service(KEYRING_SERVICE)
    }

    /// Create a store under a custom keyring service name.
    pub fn with_service(service: &str) -> Self {
        Self {
            service: service.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        keyring::Entry::new(&self.service, KEYRING_ACCOUNT)
            .map_err(|e| CredentialError::Keyring(format!("failed to access keyring: {}", e)))
    }
}

impl Default for KeyringCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for KeyringCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        let payload = match self.entry()?.get_password() {
            Ok(payload) => payload,
            Err(keyring::Error::NoEntry) => return Ok(None),
            Err(e) => {
                return Err(CredentialError::Keyring(format!(
                    "failed to read credentials: {}",
                    e
                )))
            }
        };

        let credentials: Credentials = serde_json::from_str(&payload)?;
        if !credentials.is_complete() {
            warn!("Ignoring incomplete stored credentials");
            return Ok(None);
        }
        Ok(Some(credentials))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        let payload = serde_json::to_string(credentials)?;
        self.entry()?
            .set_password(&payload)
            .map_err(|e| CredentialError::Keyring(format!("failed to store credentials: {}", e)))?;
        debug!(server = %credentials.server, "Stored credentials in keyring");
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(CredentialError::Keyring(format!(
                "failed to delete credentials: {}",
                e
            ))),
        }
    }
}

/// Credential store kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    record: Mutex<Option<Credentials>>,
}

impl MemoryCredentialStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `credentials`.
    pub fn with_credentials(credentials: Credentials) -> Self {
        Self {
            record: Mutex::new(Some(credentials)),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Credentials>> {
        self.record.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load(&self) -> Result<Option<Credentials>> {
        Ok(self.lock().clone().filter(Credentials::is_complete))
    }

    fn save(&self, credentials: &Credentials) -> Result<()> {
        *self.lock() = Some(credentials.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock() = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creds() -> Credentials {
        Credentials::new("jira.example.com", "jdoe", "hunter2").unwrap()
    }

    #[test]
    fn test_memory_store_starts_empty() {
        let store = MemoryCredentialStore::new();
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_memory_store_save_load_clear() {
        let store = MemoryCredentialStore::new();
        store.save(&creds()).unwrap();
        assert_eq!(store.load().unwrap(), Some(creds()));

        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());

        // Clearing twice is fine.
        store.clear().unwrap();
    }

    #[test]
    fn test_memory_store_replaces_record() {
        let store = MemoryCredentialStore::with_credentials(creds());
        let other = Credentials::new("other.example.com", "admin", "s3cret").unwrap();
        store.save(&other).unwrap();
        assert_eq!(store.load().unwrap(), Some(other));
    }

    #[test]
    fn test_memory_store_hides_incomplete_record() {
        let store = MemoryCredentialStore::with_credentials(Credentials {
            server: "https://jira.example.com".to_string(),
            username: String::new(),
            secret: "x".to_string(),
        });
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_stored_payload_round_trips() {
        let payload = serde_json::to_string(&creds()).unwrap();
        assert!(payload.contains("\"server\":\"https://jira.example.com\""));
        let parsed: Credentials = serde_json::from_str(&payload).unwrap();
        assert_eq!(parsed, creds());
    }

    #[test]
    fn test_keyring_store_service_name() {
        assert_eq!(KeyringCredentialStore::new().service, "repojira");
        assert_eq!(KeyringCredentialStore::with_service("custom").service, "custom");
    }
}

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use keyring::Entry;
use thiserror::Error;
use tracing::{debug, warn};

/// Storage file name in the storage directory
pub const STORAGE_FILE: &str = "storage.json";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed storage file: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Keychain error: {0}")]
    Keyring(#[from] keyring::Error),
}

/// Persistent holder of the session token.
///
/// `token` never fails: a storage read error is logged and reported as
/// absence, which makes the session look logged out.
pub trait SessionStore: Send + Sync {
    fn token(&self) -> Option<String>;
    fn set_token(&self, token: &str) -> Result<(), StoreError>;
    /// Remove the token. Removing an absent token is not an error.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process token storage
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    token: Mutex<Option<String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn token(&self) -> Option<String> {
        self.token.lock().unwrap_or_else(|p| p.into_inner()).clone()
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        let mut guard = self.token.lock().unwrap_or_else(|p| p.into_inner());
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut guard = self.token.lock().unwrap_or_else(|p| p.into_inner());
        *guard = None;
        Ok(())
    }
}

/// Key-value JSON file acting as local storage.
///
/// The token lives under `key`. Other keys in the file are left untouched.
pub struct FileSessionStore {
    path: PathBuf,
    key: String,
    // Serializes read-modify-write cycles within this process
    lock: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(storage_dir: &Path, key: impl Into<String>) -> Self {
        Self {
            path: storage_dir.join(STORAGE_FILE),
            key: key.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StoreError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, contents)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn token(&self) -> Option<String> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        match self.read_all() {
            Ok(mut entries) => entries.remove(&self.key),
            Err(e) => {
                warn!(error = %e, path = ?self.path, "Failed to read token storage");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.read_all()?;
        entries.insert(self.key.clone(), token.to_string());
        self.write_all(&entries)?;
        debug!(path = ?self.path, "Token stored");
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.lock.lock().unwrap_or_else(|p| p.into_inner());
        let mut entries = self.read_all()?;
        if entries.remove(&self.key).is_some() {
            self.write_all(&entries)?;
            debug!(path = ?self.path, "Token removed");
        }
        Ok(())
    }
}

/// Token storage in the OS keychain
pub struct KeyringSessionStore {
    service: String,
    key: String,
}

impl KeyringSessionStore {
    pub fn new(service: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            key: key.into(),
        }
    }

    fn entry(&self) -> Result<Entry, StoreError> {
        Ok(Entry::new(&self.service, &self.key)?)
    }
}

impl SessionStore for KeyringSessionStore {
    fn token(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "Failed to open keychain entry");
                return None;
            }
        };
        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read token from keychain");
                None
            }
        }
    }

    fn set_token(&self, token: &str) -> Result<(), StoreError> {
        self.entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_memory_store() {
        let store = MemorySessionStore::new();
        assert_eq!(store.token(), None);

        store.set_token("abc").unwrap();
        assert_eq!(store.token().as_deref(), Some("abc"));

        store.clear().unwrap();
        assert_eq!(store.token(), None);
        store.clear().unwrap(); // idempotent
    }

    #[test]
    fn test_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("nested");
        let store = FileSessionStore::new(&dir, "access_token");
        assert_eq!(store.token(), None);

        store.set_token("jwt-1").unwrap();
        assert_eq!(store.token().as_deref(), Some("jwt-1"));

        // A second handle on the same directory sees the token
        let other = FileSessionStore::new(&dir, "access_token");
        assert_eq!(other.token().as_deref(), Some("jwt-1"));

        store.clear().unwrap();
        assert_eq!(other.token(), None);
    }

    #[test]
    fn test_file_store_preserves_other_keys() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(
            dir.join(STORAGE_FILE),
            r#"{"theme": "dark", "access_token": "old"}"#,
        )
        .unwrap();

        let store = FileSessionStore::new(dir, "access_token");
        assert_eq!(store.token().as_deref(), Some("old"));
        store.clear().unwrap();

        let contents = std::fs::read_to_string(dir.join(STORAGE_FILE)).unwrap();
        let entries: BTreeMap<String, String> = serde_json::from_str(&contents).unwrap();
        assert_eq!(entries.get("theme").map(String::as_str), Some("dark"));
        assert!(!entries.contains_key("access_token"));
    }

    #[test]
    fn test_file_store_malformed_reads_as_absent() {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path();
        std::fs::write(dir.join(STORAGE_FILE), "not json").unwrap();

        let store = FileSessionStore::new(dir, "access_token");
        assert_eq!(store.token(), None);
        assert!(matches!(store.set_token("x"), Err(StoreError::Json(_))));
    }

    #[test]
    #[ignore = "needs an OS keychain (run with --ignored on a desktop session)"]
    fn test_keyring_store_round_trip() {
        let store = KeyringSessionStore::new("sessiongate-test", "access_token");
        store.clear().unwrap();
        assert_eq!(store.token(), None);

        store.set_token("jwt-keychain").unwrap();
        assert_eq!(store.token().as_deref(), Some("jwt-keychain"));

        // A fresh handle reads the same keychain entry
        let other = KeyringSessionStore::new("sessiongate-test", "access_token");
        assert_eq!(other.token().as_deref(), Some("jwt-keychain"));

        store.clear().unwrap();
        assert_eq!(other.token(), None);
    }
}

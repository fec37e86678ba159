//! Storage backends: where the session key-value pairs actually live.
//!
//! The web client this subsystem collaborates with keeps its session
//! in page-scoped local storage. [`Storage`] is that contract as a
//! trait: string keys, string values, no structure. Swapping the
//! backend changes durability, nothing else.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::StoreError;

/// A flat string key-value store.
///
/// Implementations must be safe to share across tasks (`Send + Sync`)
/// because the store is read from timer callbacks and written from
/// login/logout paths concurrently.
pub trait Storage: Send + Sync + 'static {
    /// Returns the value for `key`, if present.
    fn get(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

// ---------------------------------------------------------------------------
// MemoryStorage
// ---------------------------------------------------------------------------

/// In-memory storage. Nothing survives the process; used in tests and
/// for hosts that manage their own persistence.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(key);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// FileStorage
// ---------------------------------------------------------------------------

/// File-backed storage: a JSON object persisted on every mutation.
///
/// This is the cross-run analogue of the browser's local storage: a
/// restarted client finds its session again, and any logout path wipes
/// it. Reads are served from memory; the file is only touched on `set`
/// and `remove`.
pub struct FileStorage {
    path: PathBuf,
    map: Mutex<HashMap<String, String>>,
}

impl FileStorage {
    /// Opens (or creates) the storage file at `path`.
    ///
    /// # Errors
    /// Fails if an existing file cannot be read or is not a JSON
    /// string-to-string object.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let map = if path.exists() {
            let bytes = std::fs::read(&path)?;
            serde_json::from_slice(&bytes)?
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            map: Mutex::new(map),
        })
    }

    fn persist(&self, map: &HashMap<String, String>) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(map)?;
        std::fs::write(&self.path, bytes)?;
        Ok(())
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        let map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        map.insert(key.to_owned(), value.to_owned());
        self.persist(&map)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut map = self.map.lock().unwrap_or_else(|e| e.into_inner());
        if map.remove(key).is_some() {
            self.persist(&map)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_storage_set_get_remove() {
        let storage = MemoryStorage::new();
        assert_eq!(storage.get("session_id"), None);

        storage.set("session_id", "abc123").unwrap();
        assert_eq!(storage.get("session_id"), Some("abc123".into()));

        storage.remove("session_id").unwrap();
        assert_eq!(storage.get("session_id"), None);
    }

    #[test]
    fn test_memory_storage_remove_absent_key_is_ok() {
        let storage = MemoryStorage::new();
        assert!(storage.remove("never-set").is_ok());
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        {
            let storage = FileStorage::open(&path).unwrap();
            storage.set("session_id", "abc123").unwrap();
            storage.set("user_name", "Dana").unwrap();
        }

        let storage = FileStorage::open(&path).unwrap();
        assert_eq!(storage.get("session_id"), Some("abc123".into()));
        assert_eq!(storage.get("user_name"), Some("Dana".into()));
    }

    #[test]
    fn test_file_storage_remove_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");

        let storage = FileStorage::open(&path).unwrap();
        storage.set("session_id", "abc123").unwrap();
        storage.remove("session_id").unwrap();

        let reopened = FileStorage::open(&path).unwrap();
        assert_eq!(reopened.get("session_id"), None);
    }

    #[test]
    fn test_file_storage_rejects_garbage_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        std::fs::write(&path, b"not json").unwrap();

        assert!(matches!(
            FileStorage::open(&path),
            Err(StoreError::Format(_))
        ));
    }
}

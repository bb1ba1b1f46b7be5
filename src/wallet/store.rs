//! Injected key-value persistence for wallet records.
//!
//! The manager depends only on get/set/remove semantics, so any durable
//! string store can back it: browser local storage in a wasm host, a JSON
//! file for the CLI, an in-memory map for tests.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use thiserror::Error;

/// Error from the persistence substrate.
#[derive(Debug, Error)]
#[error("key-value store error: {0}")]
pub struct StoreError(pub String);

/// Durable string key-value storage.
///
/// Implementations must be `Send + Sync`; the wallet manager is shared
/// across tasks.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
}

/// In-memory store backed by `RwLock<HashMap>`. For tests and short-lived
/// sessions that don't need persistence across restarts.
#[derive(Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|e| StoreError(e.to_string()))?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|e| StoreError(e.to_string()))?
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .map_err(|e| StoreError(e.to_string()))?
            .remove(key);
        Ok(())
    }
}

/// File-backed store holding all entries in one JSON document.
///
/// Every mutation rewrites the file; fine for the single small record this
/// crate persists.
pub struct FileKeyValueStore {
    path: PathBuf,
    entries: RwLock<HashMap<String, String>>,
}

impl FileKeyValueStore {
    /// Open the store, loading existing entries if the file is present.
    /// An unreadable or malformed file starts empty rather than failing.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            File::open(&path)
                .ok()
                .and_then(|f| serde_json::from_reader(BufReader::new(f)).ok())
                .unwrap_or_else(|| {
                    tracing::warn!(path = %path.display(), "Ignoring unreadable store file");
                    HashMap::new()
                })
        } else {
            HashMap::new()
        };
        Self {
            path,
            entries: RwLock::new(entries),
        }
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<(), StoreError> {
        let file = File::create(&self.path).map_err(|e| StoreError(e.to_string()))?;
        serde_json::to_writer(BufWriter::new(file), entries)
            .map_err(|e| StoreError(e.to_string()))
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .entries
            .read()
            .map_err(|e| StoreError(e.to_string()))?
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError(e.to_string()))?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| StoreError(e.to_string()))?;
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryKeyValueStore::new();
        assert!(store.get("k").unwrap().is_none());

        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));

        store.remove("k").unwrap();
        assert!(store.get("k").unwrap().is_none());
    }

    #[test]
    fn test_memory_store_remove_absent_is_ok() {
        let store = MemoryKeyValueStore::new();
        store.remove("missing").unwrap();
    }

    #[test]
    fn test_file_store_persistence() {
        let path = std::env::temp_dir().join(format!("kv_store_test_{}.json", std::process::id()));

        {
            let store = FileKeyValueStore::open(&path);
            store.set("wallet", "{\"a\":1}").unwrap();
        }

        let reopened = FileKeyValueStore::open(&path);
        assert_eq!(reopened.get("wallet").unwrap().as_deref(), Some("{\"a\":1}"));

        reopened.remove("wallet").unwrap();
        let again = FileKeyValueStore::open(&path);
        assert!(again.get("wallet").unwrap().is_none());

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_file_store_tolerates_garbage_file() {
        let path = std::env::temp_dir().join(format!("kv_garbage_test_{}.json", std::process::id()));
        std::fs::write(&path, "not json at all").unwrap();

        let store = FileKeyValueStore::open(&path);
        assert!(store.get("anything").unwrap().is_none());

        std::fs::remove_file(&path).unwrap_or_default();
    }
}

//! Persisted State Storage
//!
//! `JsonFileStateStore` keeps the client's key-value state in a single JSON
//! file, the desktop analogue of web storage. `MemoryStateStore` holds the
//! same contract in memory for tests and ephemeral sessions.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::StateStore,
};
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// JSON-file-backed state store.
///
/// The whole map is held in memory and flushed to disk on every mutation.
/// A missing or malformed file loads as an empty map; the store must never
/// fail on first use.
pub struct JsonFileStateStore {
    path: PathBuf,
    entries: Mutex<HashMap<String, String>>,
}

impl JsonFileStateStore {
    /// Load the store from `path`, creating the parent directory if needed.
    pub async fn load(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(BridgeError::Io)?;
        }

        let entries = match tokio::fs::read(&path).await {
            Ok(bytes) => match serde_json::from_slice::<HashMap<String, String>>(&bytes) {
                Ok(map) => map,
                Err(e) => {
                    warn!(path = ?path, error = %e, "State file is malformed, starting empty");
                    HashMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(BridgeError::Io(e)),
        };

        debug!(path = ?path, keys = entries.len(), "Loaded state store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    async fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries)
            .map_err(|e| BridgeError::OperationFailed(format!("State serialization failed: {}", e)))?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(BridgeError::Io)
    }
}

#[async_trait]
impl StateStore for JsonFileStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries).await
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        if entries.remove(key).is_some() {
            self.flush(&entries).await?;
        }
        Ok(())
    }
}

/// In-memory state store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryStateStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.lock().await;
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_state_path() -> PathBuf {
        std::env::temp_dir().join(format!("streamfront-state-{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryStateStore::new();

        store.set("key", "value").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), Some("value".to_string()));
        assert!(store.has_key("key").await.unwrap());

        store.remove("key").await.unwrap();
        assert_eq!(store.get("key").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_file_store_persists_across_instances() {
        let path = temp_state_path();

        {
            let store = JsonFileStateStore::load(path.clone()).await.unwrap();
            store.set("smf_auth_v1", "{\"token\":\"t\"}").await.unwrap();
        }

        let store = JsonFileStateStore::load(path.clone()).await.unwrap();
        assert_eq!(
            store.get("smf_auth_v1").await.unwrap(),
            Some("{\"token\":\"t\"}".to_string())
        );

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn test_file_store_tolerates_malformed_file() {
        let path = temp_state_path();
        tokio::fs::write(&path, b"not json at all").await.unwrap();

        let store = JsonFileStateStore::load(path.clone()).await.unwrap();
        assert_eq!(store.get("anything").await.unwrap(), None);

        let _ = tokio::fs::remove_file(path).await;
    }

    #[tokio::test]
    async fn test_remove_missing_key_succeeds() {
        let store = MemoryStateStore::new();
        store.remove("missing").await.unwrap();
    }
}

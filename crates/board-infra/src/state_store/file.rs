//! JSON-file state store - client-local state that survives a restart.

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::RwLock;

use board_core::ports::{StateStore, StateStoreError};

/// Key-value store persisted as one pretty-printed JSON object.
///
/// The whole map is rewritten on every mutation; the stored state is a
/// handful of small entries, not a database.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl JsonFileStore {
    /// Open (or create on first write) the store at `path`.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, StateStoreError> {
        let path = path.into();
        let cache = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)
                .map_err(|err| StateStoreError::Serialization(err.to_string()))?,
            Err(err) if err.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(StateStoreError::Io(err.to_string())),
        };
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    async fn flush(&self, cache: &HashMap<String, String>) -> Result<(), StateStoreError> {
        let raw = serde_json::to_string_pretty(cache)
            .map_err(|err| StateStoreError::Serialization(err.to_string()))?;
        tokio::fs::write(&self.path, raw)
            .await
            .map_err(|err| StateStoreError::Io(err.to_string()))
    }
}

#[async_trait]
impl StateStore for JsonFileStore {
    async fn load(&self, key: &str) -> Option<String> {
        self.cache.read().await.get(key).cloned()
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), StateStoreError> {
        let mut cache = self.cache.write().await;
        cache.insert(key.to_string(), value.to_string());
        self.flush(&cache).await
    }

    async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        let mut cache = self.cache.write().await;
        cache.remove(key);
        self.flush(&cache).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("board-state-{}.json", Uuid::new_v4()))
    }

    #[tokio::test]
    async fn state_survives_reopen() {
        let path = temp_path();
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.store("rate_limit", "{\"chat\":[]}").await.unwrap();
        }
        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(
            reopened.load("rate_limit").await,
            Some("{\"chat\":[]}".to_string())
        );
        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn missing_file_starts_empty() {
        let store = JsonFileStore::open(temp_path()).await.unwrap();
        assert_eq!(store.load("anything").await, None);
    }

    #[tokio::test]
    async fn remove_persists() {
        let path = temp_path();
        {
            let store = JsonFileStore::open(&path).await.unwrap();
            store.store("a", "1").await.unwrap();
            store.remove("a").await.unwrap();
        }
        let reopened = JsonFileStore::open(&path).await.unwrap();
        assert_eq!(reopened.load("a").await, None);
        let _ = tokio::fs::remove_file(&path).await;
    }
}

//! In-memory state store - used in tests and when persistence is not wanted.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use board_core::ports::{StateStore, StateStoreError};

/// In-memory key-value store. Note: data is lost on process restart.
#[derive(Debug, Default)]
pub struct InMemoryStateStore {
    store: RwLock<HashMap<String, String>>,
}

impl InMemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for InMemoryStateStore {
    async fn load(&self, key: &str) -> Option<String> {
        self.store.read().await.get(key).cloned()
    }

    async fn store(&self, key: &str, value: &str) -> Result<(), StateStoreError> {
        self.store
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), StateStoreError> {
        self.store.write().await.remove(key);
        Ok(())
    }
}

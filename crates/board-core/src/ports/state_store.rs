//! State store port - client-local persisted key-value state.

use async_trait::async_trait;

/// Persistent key-value storage for client-local state that must survive
/// a restart (rate-limit windows, remembered identity).
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value, or `None` when absent.
    async fn load(&self, key: &str) -> Option<String>;

    /// Write a value, replacing any previous one.
    async fn store(&self, key: &str, value: &str) -> Result<(), StateStoreError>;

    /// Remove a key.
    async fn remove(&self, key: &str) -> Result<(), StateStoreError>;
}

/// State store errors.
#[derive(Debug, thiserror::Error)]
pub enum StateStoreError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),
}

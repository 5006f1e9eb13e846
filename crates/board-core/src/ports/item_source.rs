//! Item source port - the backing store boundary the polling layer reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{BoardItem, Topic};
use crate::error::SourceError;

/// Read/write access to the authoritative item store for one item kind.
///
/// `fetch_items` is an idempotent full-snapshot read, ascending by
/// creation instant. A store may implement this trait for several item
/// kinds (messages and thread comments).
#[async_trait]
pub trait ItemSource<T: BoardItem>: Send + Sync {
    /// Fetch the complete, ordered snapshot for a topic.
    async fn fetch_items(&self, topic: Topic) -> Result<Vec<T>, SourceError>;

    /// Submit a new item. The store assigns identity and creation instant.
    async fn submit_item(&self, draft: T::Draft) -> Result<T, SourceError>;

    /// Delete an item. Privileged; bypasses any client-side gating.
    async fn delete_item(&self, id: Uuid) -> Result<(), SourceError>;
}

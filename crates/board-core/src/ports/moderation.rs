//! Moderation port - privileged user-ban operations.

use async_trait::async_trait;

use crate::domain::BanRequest;
use crate::error::SourceError;

/// Ban bookkeeping on the backing store. Only the administrator may
/// invoke the mutating side; enforcement of that lives with the caller.
#[async_trait]
pub trait Moderation: Send + Sync {
    /// Record a ban. Subsequent submissions under that nickname are rejected.
    async fn ban_user(&self, request: BanRequest) -> Result<(), SourceError>;

    /// Whether a nickname is currently banned.
    async fn is_banned(&self, nickname: &str) -> Result<bool, SourceError>;
}

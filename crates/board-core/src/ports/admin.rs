//! Admin directory port - dashboard-wide listings.

use async_trait::async_trait;

use crate::domain::{Message, UserAccount};
use crate::error::SourceError;

/// Full-board listings backing the admin dashboard and its CSV export.
#[async_trait]
pub trait AdminDirectory: Send + Sync {
    /// Every registered account.
    async fn list_accounts(&self) -> Result<Vec<UserAccount>, SourceError>;

    /// Every message across both tabs, ascending by creation instant.
    async fn list_all_messages(&self) -> Result<Vec<Message>, SourceError>;
}

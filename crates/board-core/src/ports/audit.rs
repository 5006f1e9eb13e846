//! Audit trail port - recording privileged actions.

use async_trait::async_trait;
use uuid::Uuid;

/// Sink for moderation audit events. Recording must never fail the
/// operation being audited, so the methods are infallible.
#[async_trait]
pub trait AuditTrail: Send + Sync {
    /// An administrator deleted a message.
    async fn message_deleted(&self, actor: &str, message_id: Uuid);

    /// An administrator banned a user.
    async fn user_banned(&self, actor: &str, nickname: &str, reason: Option<&str>);
}

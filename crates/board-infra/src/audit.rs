//! Audit trail for security-sensitive actions.
//!
//! Recording must never fail the operation being audited; entries are
//! also mirrored to the log stream.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use board_core::ports::AuditTrail;

/// One audited action.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub action: String,
    pub actor: String,
    pub details: Option<String>,
    pub at: DateTime<Utc>,
}

/// In-memory audit trail.
#[derive(Debug, Default)]
pub struct AuditLog {
    entries: RwLock<Vec<AuditEntry>>,
}

impl AuditLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn record(&self, action: &str, actor: &str, details: Option<String>) {
        tracing::info!(action, actor, "audit event");
        self.entries.write().await.push(AuditEntry {
            action: action.to_string(),
            actor: actor.to_string(),
            details,
            at: Utc::now(),
        });
    }

    pub async fn admin_login(&self, email: &str, success: bool) {
        let action = if success {
            "ADMIN_LOGIN_SUCCESS"
        } else {
            "ADMIN_LOGIN_FAILED"
        };
        self.record(action, email, None).await;
    }

    pub async fn entries(&self) -> Vec<AuditEntry> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl AuditTrail for AuditLog {
    async fn message_deleted(&self, actor: &str, message_id: Uuid) {
        self.record(
            "MESSAGE_DELETED",
            actor,
            Some(format!("deleted message {message_id}")),
        )
        .await;
    }

    async fn user_banned(&self, actor: &str, nickname: &str, reason: Option<&str>) {
        self.record(
            "USER_BANNED",
            actor,
            Some(format!(
                "banned {nickname}: {}",
                reason.unwrap_or("no reason provided")
            )),
        )
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn records_in_order() {
        let log = AuditLog::new();
        log.admin_login("ops@example.com", true).await;
        log.user_banned("ops@example.com", "spammer", Some("flooding"))
            .await;

        let entries = log.entries().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, "ADMIN_LOGIN_SUCCESS");
        assert_eq!(entries[1].action, "USER_BANNED");
        assert!(entries[1].details.as_deref().unwrap().contains("flooding"));
    }
}

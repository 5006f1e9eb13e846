use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sanitize::sanitize_text;
use super::topic::{BoardItem, Topic};

/// Thread comment entity - a reply under a project message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadComment {
    pub id: Uuid,
    pub message_id: Uuid,
    pub nickname: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub is_verified: bool,
    pub is_admin: bool,
}

impl ThreadComment {
    /// Create a new comment with generated ID and timestamp.
    pub fn new(draft: CommentDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            message_id: draft.message_id,
            nickname: draft.nickname,
            content: draft.content,
            posted_at: Utc::now(),
            is_verified: draft.is_verified,
            is_admin: draft.is_admin,
        }
    }
}

impl BoardItem for ThreadComment {
    type Draft = CommentDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn topic(&self) -> Topic {
        Topic::Thread(self.message_id)
    }

    fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

/// A comment as submitted by a client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDraft {
    pub message_id: Uuid,
    pub nickname: String,
    pub content: String,
    pub is_verified: bool,
    pub is_admin: bool,
}

impl CommentDraft {
    pub fn new(message_id: Uuid, nickname: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            message_id,
            nickname: nickname.into(),
            content: content.into(),
            is_verified: false,
            is_admin: false,
        }
    }

    /// Sanitize every user-controlled text field. Fixed field list,
    /// same contract as [`super::MessageDraft::sanitized`].
    pub fn sanitized(self) -> Self {
        Self {
            message_id: self.message_id,
            nickname: sanitize_text(&self.nickname),
            content: sanitize_text(&self.content),
            is_verified: self.is_verified,
            is_admin: self.is_admin,
        }
    }
}

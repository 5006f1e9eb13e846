use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::sanitize::sanitize_text;
use super::topic::{BoardItem, Tab, Topic};

/// Structured fields carried only by project listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_name: String,
    pub phone_number: String,
    pub price: String,
    pub description: String,
}

/// Message entity - a post under one of the two tabs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub tab: Tab,
    pub nickname: String,
    pub content: String,
    pub posted_at: DateTime<Utc>,
    pub is_verified: bool,
    pub is_admin: bool,
    pub image_url: Option<String>,
    pub project: Option<ProjectDetails>,
}

impl Message {
    /// Create a new message with generated ID and timestamp.
    pub fn new(draft: MessageDraft) -> Self {
        Self {
            id: Uuid::new_v4(),
            tab: draft.tab,
            nickname: draft.nickname,
            content: draft.content,
            posted_at: Utc::now(),
            is_verified: draft.is_verified,
            is_admin: draft.is_admin,
            image_url: draft.image_url,
            project: draft.project,
        }
    }
}

impl BoardItem for Message {
    type Draft = MessageDraft;

    fn id(&self) -> Uuid {
        self.id
    }

    fn topic(&self) -> Topic {
        Topic::Tab(self.tab)
    }

    fn posted_at(&self) -> DateTime<Utc> {
        self.posted_at
    }
}

/// A message as submitted by a client, before the store assigns
/// identity and creation instant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageDraft {
    pub tab: Tab,
    pub nickname: String,
    pub content: String,
    pub is_verified: bool,
    pub is_admin: bool,
    pub image_url: Option<String>,
    pub project: Option<ProjectDetails>,
}

impl MessageDraft {
    /// Sanitize every user-controlled text field.
    ///
    /// The field list is fixed on purpose: adding a field to the draft
    /// without deciding how it is sanitized should be a compile-time
    /// conversation, not a runtime surprise.
    pub fn sanitized(self) -> Self {
        Self {
            tab: self.tab,
            nickname: sanitize_text(&self.nickname),
            content: sanitize_text(&self.content),
            is_verified: self.is_verified,
            is_admin: self.is_admin,
            image_url: self.image_url.map(|url| sanitize_text(&url)),
            project: self.project.map(|p| ProjectDetails {
                project_name: sanitize_text(&p.project_name),
                phone_number: sanitize_text(&p.phone_number),
                price: sanitize_text(&p.price),
                description: sanitize_text(&p.description),
            }),
        }
    }

    /// A plain chat draft with no project details.
    pub fn chat(nickname: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            tab: Tab::Chat,
            nickname: nickname.into(),
            content: content.into(),
            is_verified: false,
            is_admin: false,
            image_url: None,
            project: None,
        }
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The two top-level tabs of the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    /// Structured delivery-job listings.
    Project,
    /// Free-form chat.
    Chat,
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::Project => write!(f, "project"),
            Tab::Chat => write!(f, "chat"),
        }
    }
}

/// A partition key for board items: either a tab or a single comment
/// thread identified by its parent message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Topic {
    Tab(Tab),
    Thread(Uuid),
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Topic::Tab(tab) => write!(f, "tab:{tab}"),
            Topic::Thread(id) => write!(f, "thread:{id}"),
        }
    }
}

/// The narrow view the polling and reconciliation layers have of an item.
///
/// Within one topic, items are totally ordered by creation instant
/// ascending; sources must never reorder previously seen items.
pub trait BoardItem: Clone + Send + Sync + 'static {
    /// The shape submitted to create an item of this kind.
    type Draft: Send + 'static;

    fn id(&self) -> Uuid;
    fn topic(&self) -> Topic;
    fn posted_at(&self) -> DateTime<Utc>;
}

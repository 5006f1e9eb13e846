//! Snapshot reconciliation - merging polled snapshots into the list the
//! UI renders.
//!
//! Each snapshot is authoritative and ordered for its topic, so the
//! merge is full-replace-per-partition rather than an incremental diff.
//! There is no optimistic local insert: a post appears once it
//! round-trips through the submit response or the next poll.

use std::collections::HashMap;

use uuid::Uuid;

use board_core::domain::{BoardItem, Message, Tab, ThreadComment, Topic};

/// Replace the portion of `items` belonging to `topic` with `snapshot`,
/// leaving every other partition untouched and in order.
pub fn merge_partition<T: BoardItem>(items: &mut Vec<T>, topic: Topic, snapshot: Vec<T>) {
    items.retain(|item| item.topic() != topic);
    items.extend(snapshot);
}

/// The merged in-memory view of the board. The reconciler is the only
/// writer of this state.
#[derive(Debug, Default)]
pub struct BoardState {
    messages: Vec<Message>,
    comments: HashMap<Uuid, Vec<ThreadComment>>,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the state from an initial full load.
    pub fn load_initial(&mut self, messages: Vec<Message>, comments: Vec<ThreadComment>) {
        self.messages = messages;
        self.comments.clear();
        for comment in comments {
            self.comments
                .entry(comment.message_id)
                .or_default()
                .push(comment);
        }
    }

    /// Merge a tab snapshot. Returns whether the combined list grew,
    /// which is what drives the chat viewport follower.
    pub fn apply_tab_snapshot(&mut self, tab: Tab, snapshot: Vec<Message>) -> bool {
        let before = self.messages.len();
        merge_partition(&mut self.messages, Topic::Tab(tab), snapshot);
        self.messages.len() > before
    }

    /// Replace one thread's comments with a fresh snapshot.
    pub fn apply_thread_snapshot(&mut self, message_id: Uuid, snapshot: Vec<ThreadComment>) {
        if snapshot.is_empty() {
            self.comments.remove(&message_id);
        } else {
            self.comments.insert(message_id, snapshot);
        }
    }

    /// Drop a message and its comment thread (admin deletion takes
    /// effect locally before the next poll confirms it).
    pub fn remove_message(&mut self, id: Uuid) {
        self.messages.retain(|m| m.id != id);
        self.comments.remove(&id);
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn tab_messages(&self, tab: Tab) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(move |m| m.tab == tab)
    }

    pub fn comments_for(&self, message_id: Uuid) -> &[ThreadComment] {
        self.comments
            .get(&message_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn message_count(&self) -> usize {
        self.messages.len()
    }
}

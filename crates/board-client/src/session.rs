//! Board session - wires the posting gate, topic watches, reconciler
//! and viewport follower together behind one facade for the UI layer.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::Utc;
use tokio::sync::mpsc;
use uuid::Uuid;

use board_core::domain::{
    BanRequest, CommentDraft, Message, MessageDraft, Tab, ThreadComment, Topic, UserAccount,
};
use board_core::error::{DomainError, SourceError};
use board_core::ports::{AuditTrail, ItemSource, Moderation};

use crate::poll::{PollConfig, TopicWatch, start_topic_watch};
use crate::rate_limit::{GateDecision, PostingGate};
use crate::reconcile::BoardState;
use crate::scroll::{ScrollConfig, ScrollEffect, ScrollFollower, Viewport};

/// Events the session emits toward the rendering layer.
#[derive(Debug, Clone)]
pub enum BoardEvent {
    TabRefreshed { tab: Tab, count: usize },
    ThreadRefreshed { message_id: Uuid, count: usize },
    Scroll(ScrollEffect),
}

/// Outcome of a gated post attempt.
#[derive(Debug, Clone)]
pub enum PostOutcome {
    Posted(Message),
    RateLimited { retry_after_secs: u64 },
}

/// One client's view of the board.
///
/// Owns the merged [`BoardState`] (the single writer of the rendered
/// list), the per-tab posting gate, and the running topic watches.
pub struct BoardSession<S> {
    source: Arc<S>,
    gate: PostingGate,
    state: Arc<Mutex<BoardState>>,
    follower: Arc<Mutex<ScrollFollower>>,
    poll_config: PollConfig,
    nickname: String,
    account: Option<UserAccount>,
    audit: Option<Arc<dyn AuditTrail>>,
    events_tx: mpsc::UnboundedSender<BoardEvent>,
    events_rx: Option<mpsc::UnboundedReceiver<BoardEvent>>,
    watches: Vec<TopicWatch>,
}

impl<S> BoardSession<S>
where
    S: ItemSource<Message> + ItemSource<ThreadComment> + Moderation + 'static,
{
    pub fn new(
        source: Arc<S>,
        gate: PostingGate,
        poll_config: PollConfig,
        scroll_config: ScrollConfig,
        nickname: impl Into<String>,
        account: Option<UserAccount>,
    ) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            source,
            gate,
            state: Arc::new(Mutex::new(BoardState::new())),
            follower: Arc::new(Mutex::new(ScrollFollower::new(scroll_config))),
            poll_config,
            nickname: nickname.into(),
            account,
            audit: None,
            events_tx,
            events_rx: Some(events_rx),
            watches: Vec::new(),
        }
    }

    /// Record moderation actions to an audit trail.
    pub fn with_audit(mut self, audit: Arc<dyn AuditTrail>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// The event stream for the rendering layer. Yields `None` after the
    /// first call.
    pub fn take_events(&mut self) -> Option<mpsc::UnboundedReceiver<BoardEvent>> {
        self.events_rx.take()
    }

    pub fn is_admin(&self) -> bool {
        self.account.as_ref().is_some_and(UserAccount::is_admin)
    }

    pub fn nickname(&self) -> &str {
        &self.nickname
    }

    /// One-shot full load of both tabs before the watches take over.
    pub async fn load_initial(&self) -> Result<(), SourceError> {
        let mut messages =
            <S as ItemSource<Message>>::fetch_items(&*self.source, Topic::Tab(Tab::Project))
                .await?;
        let chats =
            <S as ItemSource<Message>>::fetch_items(&*self.source, Topic::Tab(Tab::Chat)).await?;
        messages.extend(chats);
        lock(&self.state).load_initial(messages, Vec::new());
        Ok(())
    }

    /// Start one watch per tab. Chat snapshots that grow the list drive
    /// the viewport follower.
    pub fn start_watches(&mut self) {
        for tab in [Tab::Project, Tab::Chat] {
            let state = Arc::clone(&self.state);
            let follower = Arc::clone(&self.follower);
            let events = self.events_tx.clone();
            let watch = start_topic_watch(
                Arc::clone(&self.source),
                Topic::Tab(tab),
                self.poll_config.clone(),
                move |snapshot: Vec<Message>| {
                    let (grew, count) = {
                        let mut state = lock(&state);
                        let grew = state.apply_tab_snapshot(tab, snapshot);
                        (grew, state.message_count())
                    };
                    if tab == Tab::Chat && grew {
                        let effect = lock(&follower).on_items_grown();
                        let _ = events.send(BoardEvent::Scroll(effect));
                    }
                    let _ = events.send(BoardEvent::TabRefreshed { tab, count });
                },
            );
            self.watches.push(watch);
        }
    }

    /// Watch one message's comment thread (an open thread modal).
    /// Returns the watch so the caller can stop it when the modal closes.
    pub fn watch_thread(&self, message_id: Uuid) -> TopicWatch {
        let state = Arc::clone(&self.state);
        let events = self.events_tx.clone();
        start_topic_watch(
            Arc::clone(&self.source),
            Topic::Thread(message_id),
            self.poll_config.clone(),
            move |snapshot: Vec<ThreadComment>| {
                let count = snapshot.len();
                lock(&state).apply_thread_snapshot(message_id, snapshot);
                let _ = events.send(BoardEvent::ThreadRefreshed { message_id, count });
            },
        )
    }

    /// Stop the tab watches and wait for their loops to wind down.
    pub async fn stop_watches(&mut self) {
        for watch in self.watches.drain(..) {
            watch.join().await;
        }
    }

    /// Post a message through the gate.
    ///
    /// The administrator bypasses the gate entirely. For everyone else a
    /// blocked tab short-circuits before any network traffic, and the
    /// attempt is recorded only once the submit has succeeded - so a
    /// failed submit neither consumes window budget nor loses input
    /// (the caller keeps the draft on `Err`).
    pub async fn post_message(&mut self, draft: MessageDraft) -> Result<PostOutcome, SourceError> {
        let tab = draft.tab;
        let exempt = self.is_admin();
        if !exempt {
            let now = Utc::now().timestamp_millis();
            if let GateDecision::Blocked { retry_after_secs } = self.gate.check(tab, now).await {
                return Ok(PostOutcome::RateLimited { retry_after_secs });
            }
        }

        let mut draft = draft.sanitized();
        draft.is_verified = self.account.as_ref().is_some_and(|a| a.verified);
        draft.is_admin = exempt;

        let message = <S as ItemSource<Message>>::submit_item(&*self.source, draft).await?;
        if !exempt {
            self.gate
                .record_post(tab, Utc::now().timestamp_millis())
                .await;
        }
        Ok(PostOutcome::Posted(message))
    }

    /// Post a comment under a project message. Thread comments are not
    /// gated; only top-level posts count toward the window.
    pub async fn post_comment(
        &self,
        message_id: Uuid,
        content: impl Into<String>,
    ) -> Result<ThreadComment, SourceError> {
        let mut draft = CommentDraft::new(message_id, self.nickname.clone(), content).sanitized();
        draft.is_verified = self.account.as_ref().is_some_and(|a| a.verified);
        draft.is_admin = self.is_admin();
        <S as ItemSource<ThreadComment>>::submit_item(&*self.source, draft).await
    }

    /// Delete a message. Administrator only; bypasses the gate and takes
    /// effect in local state immediately.
    pub async fn delete_message(&self, id: Uuid) -> Result<(), DomainError> {
        if !self.is_admin() {
            return Err(DomainError::Unauthorized);
        }
        <S as ItemSource<Message>>::delete_item(&*self.source, id)
            .await
            .map_err(|err| match err {
                SourceError::NotFound => DomainError::NotFound {
                    entity_type: "message",
                    id,
                },
                other => DomainError::Internal(other.to_string()),
            })?;
        lock(&self.state).remove_message(id);
        if let Some(audit) = &self.audit {
            audit.message_deleted(&self.nickname, id).await;
        }
        Ok(())
    }

    /// Ban a user by nickname. Administrator only.
    pub async fn ban_user(&self, nickname: &str, reason: Option<String>) -> Result<(), DomainError> {
        if !self.is_admin() {
            return Err(DomainError::Unauthorized);
        }
        self.source
            .ban_user(BanRequest {
                nickname: nickname.to_string(),
                banned_by: self.nickname.clone(),
                reason: reason.clone(),
            })
            .await
            .map_err(|err| DomainError::Internal(err.to_string()))?;
        if let Some(audit) = &self.audit {
            audit.user_banned(&self.nickname, nickname, reason.as_deref()).await;
        }
        Ok(())
    }

    /// Countdown hook for the blocked-state UI; see
    /// [`PostingGate::countdown_tick`].
    pub async fn countdown_tick(&mut self, tab: Tab) -> Option<u64> {
        self.gate
            .countdown_tick(tab, Utc::now().timestamp_millis())
            .await
    }

    pub fn on_scroll(&self, viewport: Viewport) {
        lock(&self.follower).on_scroll(viewport);
    }

    pub fn jump_to_bottom(&self) -> ScrollEffect {
        lock(&self.follower).jump_to_bottom()
    }

    pub fn has_new_message(&self) -> bool {
        lock(&self.follower).has_new_message()
    }

    /// Current merged view of a tab, cloned out of the reconciler state.
    pub fn messages_for(&self, tab: Tab) -> Vec<Message> {
        lock(&self.state).tab_messages(tab).cloned().collect()
    }

    pub fn comments_for(&self, message_id: Uuid) -> Vec<ThreadComment> {
        lock(&self.state).comments_for(message_id).to_vec()
    }

    pub fn message_count(&self) -> usize {
        lock(&self.state).message_count()
    }
}

/// Lock a session mutex, recovering the data on poisoning. Critical
/// sections are short and never held across an await.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    match mutex.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

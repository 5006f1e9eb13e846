//! In-memory board store.
//!
//! Single-process stand-in for the real backing store. Snapshots are
//! returned ascending by creation instant, so repeated polls never
//! reorder previously seen items.

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use board_core::domain::{
    BanRequest, BannedUser, CommentDraft, Message, MessageDraft, ThreadComment, Topic, UserAccount,
};
use board_core::error::SourceError;
use board_core::ports::{AdminDirectory, ItemSource, Moderation};

/// In-memory board store.
///
/// Note: data is lost on process restart.
#[derive(Debug, Default)]
pub struct InMemoryBoard {
    messages: RwLock<Vec<Message>>,
    comments: RwLock<Vec<ThreadComment>>,
    accounts: RwLock<Vec<UserAccount>>,
    banned: RwLock<Vec<BannedUser>>,
}

impl InMemoryBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account. Fields are sanitized and validated before
    /// anything is stored; nicknames are unique board-wide.
    pub async fn register_account(&self, account: UserAccount) -> Result<UserAccount, SourceError> {
        let account = account.sanitized();
        account
            .validate()
            .map_err(|err| SourceError::Rejected(err.to_string()))?;
        let mut accounts = self.accounts.write().await;
        if accounts.iter().any(|a| a.nickname == account.nickname) {
            return Err(SourceError::Rejected(format!(
                "nickname already registered: {}",
                account.nickname
            )));
        }
        accounts.push(account.clone());
        tracing::debug!(nickname = %account.nickname, "account registered");
        Ok(account)
    }

    /// Seed the store, bypassing ban checks. Test and demo setup only.
    pub async fn seed_messages(&self, drafts: Vec<MessageDraft>) -> Vec<Message> {
        let mut messages = self.messages.write().await;
        drafts
            .into_iter()
            .map(|draft| {
                let message = Message::new(draft);
                messages.push(message.clone());
                message
            })
            .collect()
    }

    async fn ensure_not_banned(&self, nickname: &str) -> Result<(), SourceError> {
        if self
            .banned
            .read()
            .await
            .iter()
            .any(|b| b.nickname == nickname)
        {
            return Err(SourceError::Rejected(format!("user is banned: {nickname}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ItemSource<Message> for InMemoryBoard {
    async fn fetch_items(&self, topic: Topic) -> Result<Vec<Message>, SourceError> {
        // Messages live under tabs; a thread topic holds only comments.
        let Topic::Tab(tab) = topic else {
            return Ok(Vec::new());
        };
        let messages = self.messages.read().await;
        let mut snapshot: Vec<Message> = messages.iter().filter(|m| m.tab == tab).cloned().collect();
        snapshot.sort_by_key(|m| (m.posted_at, m.id));
        Ok(snapshot)
    }

    async fn submit_item(&self, draft: MessageDraft) -> Result<Message, SourceError> {
        self.ensure_not_banned(&draft.nickname).await?;
        let message = Message::new(draft);
        self.messages.write().await.push(message.clone());
        tracing::debug!(id = %message.id, tab = %message.tab, "message stored");
        Ok(message)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), SourceError> {
        {
            let mut messages = self.messages.write().await;
            let before = messages.len();
            messages.retain(|m| m.id != id);
            if messages.len() == before {
                return Err(SourceError::NotFound);
            }
        }
        // Deleting a message drops its comment thread with it.
        self.comments.write().await.retain(|c| c.message_id != id);
        Ok(())
    }
}

#[async_trait]
impl ItemSource<ThreadComment> for InMemoryBoard {
    async fn fetch_items(&self, topic: Topic) -> Result<Vec<ThreadComment>, SourceError> {
        let Topic::Thread(message_id) = topic else {
            return Ok(Vec::new());
        };
        let comments = self.comments.read().await;
        let mut snapshot: Vec<ThreadComment> = comments
            .iter()
            .filter(|c| c.message_id == message_id)
            .cloned()
            .collect();
        snapshot.sort_by_key(|c| (c.posted_at, c.id));
        Ok(snapshot)
    }

    async fn submit_item(&self, draft: CommentDraft) -> Result<ThreadComment, SourceError> {
        self.ensure_not_banned(&draft.nickname).await?;
        if !self
            .messages
            .read()
            .await
            .iter()
            .any(|m| m.id == draft.message_id)
        {
            return Err(SourceError::NotFound);
        }
        let comment = ThreadComment::new(draft);
        self.comments.write().await.push(comment.clone());
        Ok(comment)
    }

    async fn delete_item(&self, id: Uuid) -> Result<(), SourceError> {
        let mut comments = self.comments.write().await;
        let before = comments.len();
        comments.retain(|c| c.id != id);
        if comments.len() == before {
            return Err(SourceError::NotFound);
        }
        Ok(())
    }
}

#[async_trait]
impl Moderation for InMemoryBoard {
    async fn ban_user(&self, request: BanRequest) -> Result<(), SourceError> {
        tracing::info!(
            nickname = %request.nickname,
            banned_by = %request.banned_by,
            "user banned"
        );
        self.banned.write().await.push(BannedUser {
            nickname: request.nickname,
            reason: request.reason,
            banned_at: Utc::now(),
        });
        Ok(())
    }

    async fn is_banned(&self, nickname: &str) -> Result<bool, SourceError> {
        Ok(self
            .banned
            .read()
            .await
            .iter()
            .any(|b| b.nickname == nickname))
    }
}

#[async_trait]
impl AdminDirectory for InMemoryBoard {
    async fn list_accounts(&self) -> Result<Vec<UserAccount>, SourceError> {
        Ok(self.accounts.read().await.clone())
    }

    async fn list_all_messages(&self) -> Result<Vec<Message>, SourceError> {
        let mut all = self.messages.read().await.clone();
        all.sort_by_key(|m| (m.posted_at, m.id));
        Ok(all)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_core::domain::Tab;

    #[tokio::test]
    async fn snapshots_are_ordered_and_tab_scoped() {
        let board = InMemoryBoard::new();
        let _chat = <InMemoryBoard as ItemSource<Message>>::submit_item(
            &board,
            MessageDraft::chat("a", "chat msg"),
        )
        .await
        .unwrap();
        let project = <InMemoryBoard as ItemSource<Message>>::submit_item(
            &board,
            MessageDraft {
                tab: Tab::Project,
                ..MessageDraft::chat("b", "job")
            },
        )
        .await
        .unwrap();

        let snapshot: Vec<Message> = board.fetch_items(Topic::Tab(Tab::Project)).await.unwrap();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].id, project.id);
    }

    #[tokio::test]
    async fn banned_users_cannot_post() {
        let board = InMemoryBoard::new();
        board
            .ban_user(BanRequest {
                nickname: "spammer".to_string(),
                banned_by: "admin".to_string(),
                reason: Some("flooding".to_string()),
            })
            .await
            .unwrap();

        let result = <InMemoryBoard as ItemSource<Message>>::submit_item(
            &board,
            MessageDraft::chat("spammer", "buy now"),
        )
        .await;
        assert!(matches!(result, Err(SourceError::Rejected(_))));
        assert!(board.is_banned("spammer").await.unwrap());
    }

    #[tokio::test]
    async fn deleting_a_message_drops_its_thread() {
        let board = InMemoryBoard::new();
        let message = <InMemoryBoard as ItemSource<Message>>::submit_item(
            &board,
            MessageDraft {
                tab: Tab::Project,
                ..MessageDraft::chat("acme", "night route")
            },
        )
        .await
        .unwrap();
        <InMemoryBoard as ItemSource<ThreadComment>>::submit_item(
            &board,
            CommentDraft::new(message.id, "driver", "interested"),
        )
        .await
        .unwrap();

        <InMemoryBoard as ItemSource<Message>>::delete_item(&board, message.id)
            .await
            .unwrap();

        let comments: Vec<ThreadComment> =
            board.fetch_items(Topic::Thread(message.id)).await.unwrap();
        assert!(comments.is_empty());
    }

    #[tokio::test]
    async fn comment_requires_existing_parent() {
        let board = InMemoryBoard::new();
        let result = <InMemoryBoard as ItemSource<ThreadComment>>::submit_item(
            &board,
            CommentDraft::new(Uuid::new_v4(), "driver", "hello?"),
        )
        .await;
        assert!(matches!(result, Err(SourceError::NotFound)));
    }

    #[tokio::test]
    async fn registration_rejects_malformed_contact_fields() {
        let board = InMemoryBoard::new();
        let mut account = UserAccount::driver("kenji", "090-1111-2222");
        account.email = Some("not-an-email".to_string());
        assert!(matches!(
            board.register_account(account).await,
            Err(SourceError::Rejected(_))
        ));

        let result = board
            .register_account(UserAccount::driver("kenji", "call me maybe"))
            .await;
        assert!(matches!(result, Err(SourceError::Rejected(_))));
        assert!(board.list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn registration_sanitizes_text_fields() {
        let board = InMemoryBoard::new();
        let stored = board
            .register_account(UserAccount::driver(
                "<script>alert(1)</script>kenji",
                "090-1111-2222",
            ))
            .await
            .unwrap();
        assert_eq!(stored.nickname, "kenji");
        assert_eq!(board.list_accounts().await.unwrap()[0].nickname, "kenji");
    }

    #[tokio::test]
    async fn duplicate_nickname_is_rejected() {
        let board = InMemoryBoard::new();
        board
            .register_account(UserAccount::driver("kenji", "090-1111-2222"))
            .await
            .unwrap();
        let result = board
            .register_account(UserAccount::driver("kenji", "090-3333-4444"))
            .await;
        assert!(matches!(result, Err(SourceError::Rejected(_))));
        assert_eq!(board.list_accounts().await.unwrap().len(), 1);
    }
}

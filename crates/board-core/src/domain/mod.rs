//! Domain entities - the core business objects.

mod account;
mod comment;
mod message;
mod sanitize;
mod topic;

pub use account::{AccountType, BanRequest, BannedUser, UserAccount};
pub use comment::{CommentDraft, ThreadComment};
pub use message::{Message, MessageDraft, ProjectDetails};
pub use sanitize::{is_valid_email, is_valid_phone, sanitize_text};
pub use topic::{BoardItem, Tab, Topic};

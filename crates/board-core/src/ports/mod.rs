//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod admin;
mod audit;
mod item_source;
mod moderation;
mod state_store;

pub use admin::AdminDirectory;
pub use audit::AuditTrail;
pub use item_source::ItemSource;
pub use moderation::Moderation;
pub use state_store::{StateStore, StateStoreError};

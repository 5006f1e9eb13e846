//! # Board Infrastructure
//!
//! Concrete implementations of the ports defined in `board-core`:
//! the backing item store, client-local state stores, the audit trail,
//! and the admin CSV export.
//!
//! Everything here is in-memory or file-backed; a networked backend
//! implements the same ports without touching the client core.

pub mod audit;
pub mod board;
pub mod export;
pub mod state_store;

pub use audit::{AuditEntry, AuditLog};
pub use board::InMemoryBoard;
pub use state_store::{InMemoryStateStore, JsonFileStore};

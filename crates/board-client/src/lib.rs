//! # Board Client
//!
//! The client-side core of the freight board: the posting gate
//! (sliding-window rate limiting with a cooldown block), fixed-interval
//! topic polling, snapshot reconciliation, and viewport following.
//!
//! The board has no push transport; clients re-fetch authoritative
//! snapshots on a fixed cadence and merge them partition by partition.

pub mod poll;
pub mod rate_limit;
pub mod reconcile;
pub mod scroll;
pub mod session;

pub use poll::{PollConfig, TopicWatch, start_topic_watch};
pub use rate_limit::{GateDecision, PostingGate, RateLimitConfig};
pub use reconcile::{BoardState, merge_partition};
pub use scroll::{ScrollConfig, ScrollEffect, ScrollFollower, Viewport};
pub use session::{BoardEvent, BoardSession, PostOutcome};

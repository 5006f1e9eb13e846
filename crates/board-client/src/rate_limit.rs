//! Client-local posting gate - sliding-window rate limiting per tab.
//!
//! Advisory/UX only: the gate throttles the compose form and drives the
//! cooldown countdown. It is not a security boundary; server-side
//! enforcement is a separate concern.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use board_core::domain::Tab;
use board_core::ports::StateStore;

/// Key under which the serialized per-tab window map is persisted.
const STORAGE_KEY: &str = "board_rate_limit";

/// Posting gate configuration.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Sliding window duration.
    pub window: Duration,
    /// Maximum posts per window.
    pub max_posts: u32,
    /// Block duration once the cap is exceeded.
    pub block: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: Duration::from_millis(30_000),
            max_posts: 5,
            block: Duration::from_millis(60_000),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            window: Duration::from_millis(
                std::env::var("BOARD_RATE_WINDOW_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.window.as_millis() as u64),
            ),
            max_posts: std::env::var("BOARD_RATE_MAX_POSTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_posts),
            block: Duration::from_millis(
                std::env::var("BOARD_RATE_BLOCK_MS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.block.as_millis() as u64),
            ),
        }
    }
}

/// Per-tab window state. Epoch milliseconds, most recent last.
///
/// While `blocked_until` is set the timestamp history is irrelevant; it
/// is emptied on entry to the blocked state so the next window starts
/// fresh once the block expires.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabWindow {
    pub timestamps: Vec<i64>,
    pub blocked_until: Option<i64>,
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    Allowed,
    Blocked { retry_after_secs: u64 },
}

/// The posting gate: one sliding window per tab, persisted across
/// restarts through a [`StateStore`].
///
/// State machine per tab: `Open -> (cap exceeded) -> Blocked ->
/// (block elapses) -> Open`. No other transitions.
pub struct PostingGate {
    config: RateLimitConfig,
    states: HashMap<Tab, TabWindow>,
    store: Arc<dyn StateStore>,
}

impl PostingGate {
    /// Restore persisted windows from the store, falling back to empty
    /// state when absent or unreadable.
    pub async fn load(config: RateLimitConfig, store: Arc<dyn StateStore>) -> Self {
        let states = match store.load(STORAGE_KEY).await {
            Some(raw) => match serde_json::from_str(&raw) {
                Ok(states) => states,
                Err(err) => {
                    tracing::warn!(error = %err, "discarding unreadable rate-limit state");
                    HashMap::new()
                }
            },
            None => HashMap::new(),
        };
        Self {
            config,
            states,
            store,
        }
    }

    /// Decide whether a post attempt on `tab` may proceed at `now_ms`.
    ///
    /// Tripping the cap transitions the tab into the blocked state and
    /// clears its timestamp history. An allowed attempt leaves state
    /// unchanged; the caller records it with [`Self::record_post`] only
    /// after the submit succeeds.
    pub async fn check(&mut self, tab: Tab, now_ms: i64) -> GateDecision {
        let window_ms = self.config.window.as_millis() as i64;
        let block_ms = self.config.block.as_millis() as i64;
        let max_posts = self.config.max_posts as usize;

        let (decision, mutated) = {
            let state = self.states.entry(tab).or_default();
            if let Some(until) = state.blocked_until {
                if until > now_ms {
                    (
                        GateDecision::Blocked {
                            retry_after_secs: ceil_secs(until - now_ms),
                        },
                        false,
                    )
                } else {
                    // Block elapsed: fresh window.
                    *state = TabWindow::default();
                    (GateDecision::Allowed, true)
                }
            } else {
                let recent = state
                    .timestamps
                    .iter()
                    .filter(|&&t| now_ms - t < window_ms)
                    .count();
                if recent >= max_posts {
                    state.timestamps.clear();
                    state.blocked_until = Some(now_ms + block_ms);
                    (
                        GateDecision::Blocked {
                            retry_after_secs: ceil_secs(block_ms),
                        },
                        true,
                    )
                } else {
                    (GateDecision::Allowed, false)
                }
            }
        };

        if mutated {
            self.persist().await;
        }
        decision
    }

    /// Record a successful post at `now_ms`. Never called speculatively,
    /// and never for the administrator.
    pub async fn record_post(&mut self, tab: Tab, now_ms: i64) {
        let window_ms = self.config.window.as_millis() as i64;
        let state = self.states.entry(tab).or_default();
        state.timestamps.retain(|&t| now_ms - t < window_ms);
        state.timestamps.push(now_ms);
        self.persist().await;
    }

    /// Remaining cooldown in whole seconds (rounded up), or `None` when
    /// not blocked.
    pub fn remaining_block_secs(&self, tab: Tab, now_ms: i64) -> Option<u64> {
        self.states
            .get(&tab)
            .and_then(|state| state.blocked_until)
            .filter(|&until| until > now_ms)
            .map(|until| ceil_secs(until - now_ms))
    }

    /// Recurring countdown hook. Returns the remaining seconds while
    /// blocked; clears the block the moment it has elapsed so the
    /// countdown and the gate observe consistent state.
    pub async fn countdown_tick(&mut self, tab: Tab, now_ms: i64) -> Option<u64> {
        {
            let Some(state) = self.states.get_mut(&tab) else {
                return None;
            };
            match state.blocked_until {
                Some(until) if until > now_ms => return Some(ceil_secs(until - now_ms)),
                Some(_) => *state = TabWindow::default(),
                None => return None,
            }
        }
        self.persist().await;
        None
    }

    /// Write the window map back to the store. Persistence failures are
    /// logged and swallowed: the gate itself never fails.
    async fn persist(&self) {
        let raw = match serde_json::to_string(&self.states) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(error = %err, "failed to serialize rate-limit state");
                return;
            }
        };
        if let Err(err) = self.store.store(STORAGE_KEY, &raw).await {
            tracing::warn!(error = %err, "failed to persist rate-limit state");
        }
    }
}

fn ceil_secs(ms: i64) -> u64 {
    (ms.max(0) as u64).div_ceil(1000)
}

//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Nickname used for posts from this session.
    pub nickname: String,
    /// Run as the board administrator (gate-exempt, moderation enabled).
    pub admin: bool,
    /// Where to persist client-local state. `None` keeps it in memory.
    pub state_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            nickname: env::var("BOARD_NICKNAME").unwrap_or_else(|_| "guest1".to_string()),
            admin: env::var("BOARD_ADMIN")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
            state_file: env::var("BOARD_STATE_FILE").ok().map(PathBuf::from),
        }
    }
}

// src/config.rs

use std::env;
use std::time::Duration;

use dotenvy::dotenv;

/// How long a wrong answer stays highlighted before the widget unlocks again.
pub const REVERT_DELAY_MS: u64 = 2000;

/// Buffered notices per session before slow subscribers start lagging.
pub const NOTICE_CHANNEL_CAPACITY: usize = 64;

/// Buffered `ItemCompleted` events before a slow view listener lags.
pub const COMPLETION_BUS_CAPACITY: usize = 128;

pub const DEFAULT_PORT: u16 = 3001;

/// A session with no commands for this long shuts itself down.
pub const SESSION_IDLE_TIMEOUT_SECS: u64 = 30 * 60;

/// How long a successfully completed session stays readable.
pub const COMPLETED_SESSION_LINGER_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the learning platform REST API (e.g. `http://localhost:8000/api/`).
    pub learning_api_url: String,
    /// Optional bearer token forwarded to the learning API.
    pub learning_api_token: Option<String>,
    pub port: u16,
    pub revert_delay_ms: u64,
    pub session_idle_secs: u64,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();

        let learning_api_url = env::var("LEARNING_API_URL")
            .expect("LEARNING_API_URL must be set");

        let learning_api_token = env::var("LEARNING_API_TOKEN")
            .ok()
            .filter(|token| !token.is_empty());

        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let revert_delay_ms = env::var("QUIZ_REVERT_DELAY_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .unwrap_or(REVERT_DELAY_MS);

        let session_idle_secs = env::var("QUIZ_SESSION_IDLE_SECS")
            .ok()
            .and_then(|secs| secs.parse().ok())
            .unwrap_or(SESSION_IDLE_TIMEOUT_SECS);

        let rust_log = env::var("RUST_LOG")
            .unwrap_or_else(|_| "info".to_string());

        Self {
            learning_api_url,
            learning_api_token,
            port,
            revert_delay_ms,
            session_idle_secs,
            rust_log,
        }
    }

    pub fn revert_delay(&self) -> Duration {
        Duration::from_millis(self.revert_delay_ms)
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }
}

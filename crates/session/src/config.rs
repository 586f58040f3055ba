use std::env;
use std::time::Duration;

use huddle_shared::constants::{MAX_MESSAGE_LENGTH, TYPING_TIMEOUT_MS};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub typing_timeout_ms: u64,
    pub max_message_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            typing_timeout_ms: TYPING_TIMEOUT_MS,
            max_message_length: MAX_MESSAGE_LENGTH,
        }
    }
}

impl SessionConfig {
    pub fn from_env() -> Self {
        Self {
            typing_timeout_ms: env::var("HUDDLE_TYPING_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(TYPING_TIMEOUT_MS),
            max_message_length: env::var("HUDDLE_MAX_MESSAGE_LENGTH")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|len| *len > 0)
                .unwrap_or(MAX_MESSAGE_LENGTH),
        }
    }

    pub fn typing_timeout(&self) -> Duration {
        Duration::from_millis(self.typing_timeout_ms)
    }
}

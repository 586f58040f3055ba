use serde::Serialize;
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingIndicator {
    pub room_id: String,
    pub user_id: String,
    pub username: String,
    #[serde(skip)]
    pub refreshed_at: Instant,
    /// Bumped on every refresh so an expiry scheduled for an older refresh
    /// can tell it is stale.
    #[serde(skip)]
    pub generation: u64,
}

impl TypingIndicator {
    pub fn is_live(&self, now: Instant, timeout: std::time::Duration) -> bool {
        now.saturating_duration_since(self.refreshed_at) < timeout
    }
}

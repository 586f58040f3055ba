use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CallKind {
    #[serde(alias = "audio")]
    Voice,
    Video,
}

/// Opaque handle to the media transport carrying a call. This layer never
/// looks inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaSessionRef(pub String);

impl MediaSessionRef {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for MediaSessionRef {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub room_id: String,
    pub kind: CallKind,
    pub started_by: String,
    pub started_at: DateTime<Utc>,
    pub media: MediaSessionRef,
}

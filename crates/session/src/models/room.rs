use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

/// Sidebar summary of the newest message in a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastMessage {
    pub message_id: String,
    pub author_name: String,
    pub preview: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    /// Join order, no duplicates.
    pub members: Vec<String>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub last_message: Option<LastMessage>,
    /// user_id -> messages received since the user last opened the room
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub unread: HashMap<String, u32>,
}

impl Room {
    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m == user_id)
    }

    /// Returns false when the user was already a member.
    pub fn add_member(&mut self, user_id: &str) -> bool {
        if self.is_member(user_id) {
            return false;
        }
        self.members.push(user_id.to_string());
        true
    }

    pub fn remove_member(&mut self, user_id: &str) -> bool {
        let before = self.members.len();
        self.members.retain(|m| m != user_id);
        self.unread.remove(user_id);
        before != self.members.len()
    }

    pub fn unread_for(&self, user_id: &str) -> u32 {
        self.unread.get(user_id).copied().unwrap_or(0)
    }

    pub fn is_private(&self) -> bool {
        self.visibility == Visibility::Private
    }
}

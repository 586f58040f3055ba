use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    Image,
    File,
}

impl MessageKind {
    pub fn from_mime(mime: &str) -> Self {
        if huddle_shared::format::is_image_mime(mime) {
            MessageKind::Image
        } else {
            MessageKind::File
        }
    }

    pub fn is_attachment(&self) -> bool {
        !matches!(self, MessageKind::Text)
    }
}

/// Where an uploaded file can be fetched from, as handed back by the upload
/// collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub emoji: String,
    pub user_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub room_id: String,
    pub author_id: String,
    pub author_name: String,
    pub content: String,
    pub kind: MessageKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<Attachment>,
    pub created_at: DateTime<Utc>,
    pub is_edited: bool,
    pub edited_at: Option<DateTime<Utc>>,
    /// First-reacted emoji first.
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// Flips `user_id`'s reaction with `emoji`. Returns true if the reaction
    /// is now present.
    pub fn toggle_reaction(&mut self, user_id: &str, emoji: &str) -> bool {
        match self.reactions.iter().position(|r| r.emoji == emoji) {
            Some(idx) => {
                let entry = &mut self.reactions[idx];
                if let Some(pos) = entry.user_ids.iter().position(|u| u == user_id) {
                    entry.user_ids.remove(pos);
                    if entry.user_ids.is_empty() {
                        self.reactions.remove(idx);
                    }
                    false
                } else {
                    entry.user_ids.push(user_id.to_string());
                    true
                }
            }
            None => {
                self.reactions.push(Reaction {
                    emoji: emoji.to_string(),
                    user_ids: vec![user_id.to_string()],
                });
                true
            }
        }
    }

    /// Removes every reaction by `user_id`, dropping emptied entries.
    pub fn clear_reactions_by(&mut self, user_id: &str) {
        for entry in &mut self.reactions {
            entry.user_ids.retain(|u| u != user_id);
        }
        self.reactions.retain(|r| !r.user_ids.is_empty());
    }
}

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::{Call, Message, Room, UserStatus};

// ── Session → Subscribers ──

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    RoomCreated {
        room: Room,
    },
    MemberJoined {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    MemberLeft {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
    },
    Message {
        message: Message,
    },
    MessageEdit {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        content: String,
        #[serde(rename = "editedAt")]
        edited_at: DateTime<Utc>,
    },
    MessageDelete {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
    },
    ReactionAdd {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
        emoji: String,
    },
    ReactionRemove {
        #[serde(rename = "messageId")]
        message_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
        emoji: String,
    },
    Typing {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "userId")]
        user_id: String,
        username: String,
        active: bool,
    },
    Presence {
        #[serde(rename = "userId")]
        user_id: String,
        status: UserStatus,
    },
    UserRemoved {
        #[serde(rename = "userId")]
        user_id: String,
    },
    CallStarted {
        call: Call,
    },
    CallEnded {
        #[serde(rename = "roomId")]
        room_id: String,
        #[serde(rename = "callId")]
        call_id: String,
    },
}

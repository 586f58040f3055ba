mod session_event;

pub use session_event::SessionEvent;

use serde::Deserialize;

use crate::models::{Attachment, CallKind, MediaSessionRef, MessageKind, UserStatus, Visibility};

// ── Sync collaborator → Session ──

/// A change reported by the external sync collaborator. Each one is folded
/// into state through the same actor-scoped operations local calls use.
/// Rooms, messages and calls keep the `id` their author assigned so later
/// updates can refer to them; it is generated locally when absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RemoteUpdate {
    UserJoined {
        #[serde(rename = "userId")]
        user_id: String,
        name: String,
        #[serde(default)]
        status: UserStatus,
    },
    Presence {
        #[serde(rename = "userId")]
        user_id: String,
        status: UserStatus,
    },
    UserLeft {
        #[serde(rename = "userId")]
        user_id: String,
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
    RoomCreated {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "userId")]
        user_id: String,
        name: String,
        #[serde(default)]
        description: String,
        #[serde(default)]
        visibility: Visibility,
    },
    MessagePosted {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        content: String,
        #[serde(default)]
        kind: MessageKind,
        #[serde(default)]
        attachment: Option<Attachment>,
    },
    MessageEdited {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "messageId")]
        message_id: String,
        content: String,
    },
    MessageDeleted {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "messageId")]
        message_id: String,
    },
    ReactionToggled {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "messageId")]
        message_id: String,
        emoji: String,
    },
    Typing {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        active: bool,
    },
    CallStarted {
        #[serde(default)]
        id: Option<String>,
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "roomId")]
        room_id: String,
        kind: CallKind,
        #[serde(default)]
        media: Option<MediaSessionRef>,
    },
    /// Ends the call `user_id` started, wherever it is.
    CallEnded {
        #[serde(rename = "userId")]
        user_id: String,
    },
}

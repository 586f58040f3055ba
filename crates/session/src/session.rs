use std::sync::Arc;

use crate::error::SessionResult;
use crate::models::{
    Attachment, Call, CallKind, Message, MessageKind, Room, TypingIndicator, User, UserStatus,
    Visibility,
};
use crate::store::{Caller, ChatStore, SessionId};
use crate::views::{self, MemberPartition};

/// One signed-in user's handle on a [`ChatStore`]. The hosting shell creates
/// it with [`ChatStore::connect`] and passes it to whatever renders the chat.
#[derive(Clone)]
pub struct ChatSession {
    id: SessionId,
    store: Arc<ChatStore>,
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession").field("id", &self.id).finish()
    }
}

impl ChatSession {
    pub(crate) fn new(id: SessionId, store: Arc<ChatStore>) -> Self {
        Self { id, store }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn store(&self) -> &Arc<ChatStore> {
        &self.store
    }

    fn caller(&self) -> Caller {
        Caller::Session(self.id)
    }

    /// `None` once the session has logged out.
    pub async fn current_user(&self) -> Option<User> {
        self.store.session_user(self.id).await
    }

    pub async fn active_room(&self) -> Option<Room> {
        self.store.session_active_room(self.id).await
    }

    pub async fn active_call(&self) -> Option<Call> {
        self.store.session_active_call(self.id).await
    }

    // ── Rooms ──

    pub async fn create_room(
        &self,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> SessionResult<Room> {
        self.store
            .create_room(&self.caller(), None, name, description, visibility)
            .await
    }

    /// Opens a room and clears its unread count for this user.
    pub async fn set_active_room(&self, room_id: &str) -> SessionResult<Room> {
        self.store.set_active_room(self.id, room_id).await
    }

    pub async fn join_room(&self, room_id: &str) -> SessionResult<Room> {
        self.store.join_room(&self.caller(), room_id).await
    }

    pub async fn leave_room(&self, room_id: &str) -> SessionResult<()> {
        self.store.leave_room(&self.caller(), room_id).await
    }

    pub async fn invite(&self, room_id: &str, user_id: &str) -> SessionResult<()> {
        self.store.invite(&self.caller(), room_id, user_id).await
    }

    // ── Messages ──

    pub async fn send_message(
        &self,
        room_id: &str,
        content: &str,
        kind: MessageKind,
        attachment: Option<Attachment>,
    ) -> SessionResult<Message> {
        self.store
            .send_message(&self.caller(), None, room_id, content, kind, attachment)
            .await
    }

    pub async fn send_text(&self, room_id: &str, content: &str) -> SessionResult<Message> {
        self.send_message(room_id, content, MessageKind::Text, None)
            .await
    }

    /// Sends an uploaded file as an image or file message depending on its
    /// MIME type, captioned with the default text.
    pub async fn send_attachment(
        &self,
        room_id: &str,
        mime: &str,
        attachment: Attachment,
    ) -> SessionResult<Message> {
        self.send_message(room_id, "", MessageKind::from_mime(mime), Some(attachment))
            .await
    }

    pub async fn edit_message(&self, message_id: &str, content: &str) -> SessionResult<Message> {
        self.store
            .edit_message(&self.caller(), message_id, content)
            .await
    }

    pub async fn delete_message(&self, message_id: &str) -> SessionResult<()> {
        self.store.delete_message(&self.caller(), message_id).await
    }

    /// Toggles this user's `emoji` reaction. Returns true if it is now set.
    pub async fn add_reaction(&self, message_id: &str, emoji: &str) -> SessionResult<bool> {
        self.store
            .toggle_reaction(&self.caller(), message_id, emoji)
            .await
    }

    // ── Presence ──

    pub async fn set_typing(&self, room_id: &str, is_typing: bool) -> SessionResult<()> {
        self.store
            .set_typing(&self.caller(), room_id, is_typing)
            .await
    }

    pub async fn set_status(&self, status: UserStatus) -> SessionResult<()> {
        self.store.set_status(&self.caller(), status).await
    }

    // ── Calls ──

    pub async fn start_call(&self, room_id: &str, kind: CallKind) -> SessionResult<Call> {
        self.store
            .start_call(&self.caller(), room_id, kind, None, None)
            .await
    }

    pub async fn end_call(&self) -> SessionResult<Option<Call>> {
        self.store.end_call(&self.caller()).await
    }

    pub async fn logout(&self) -> SessionResult<()> {
        self.store.logout(self.id).await
    }

    // ── Views ──

    /// Rooms this user belongs to, filtered by `search`.
    pub async fn rooms(&self, search: &str) -> Vec<Room> {
        let Some(user) = self.current_user().await else {
            return Vec::new();
        };
        let snapshot = self.store.snapshot().await;
        views::rooms_for(&snapshot, &user.id, search)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn messages(&self, room_id: &str) -> Vec<Message> {
        let snapshot = self.store.snapshot().await;
        views::room_messages(&snapshot, room_id)
            .into_iter()
            .cloned()
            .collect()
    }

    pub async fn members(&self, room_id: &str) -> MemberPartition {
        let snapshot = self.store.snapshot().await;
        views::room_members(&snapshot, room_id)
    }

    /// Who else is typing in `room_id`.
    pub async fn typing(&self, room_id: &str) -> Vec<TypingIndicator> {
        let me = self.current_user().await.map(|u| u.id);
        let snapshot = self.store.snapshot().await;
        views::typing_in_room(
            &snapshot,
            room_id,
            me.as_deref(),
            self.store.config().typing_timeout(),
        )
        .into_iter()
        .cloned()
        .collect()
    }

    /// "alice is typing" style line for `room_id`, if anyone else is.
    pub async fn typing_banner(&self, room_id: &str) -> Option<String> {
        let names: Vec<String> = self
            .typing(room_id)
            .await
            .into_iter()
            .map(|t| t.username)
            .collect();
        huddle_shared::format::typing_banner(&names)
    }

    pub async fn unread(&self, room_id: &str) -> u32 {
        let Some(user) = self.current_user().await else {
            return 0;
        };
        let snapshot = self.store.snapshot().await;
        views::unread_count(&snapshot, room_id, &user.id)
    }
}

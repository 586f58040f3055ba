use huddle_shared::format::attachment_caption;
use huddle_shared::validation::{validate_attachment_name, validate_emoji, validate_message_content};

use super::{assign_id, Caller, ChatStore, StoreState};
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::models::{Attachment, LastMessage, Message, MessageKind};

fn summary(message: &Message) -> LastMessage {
    LastMessage {
        message_id: message.id.clone(),
        author_name: message.author_name.clone(),
        preview: message.content.clone(),
        created_at: message.created_at,
    }
}

fn validate_attachment(attachment: &Attachment) -> SessionResult<()> {
    url::Url::parse(attachment.url.trim())
        .map_err(|e| SessionError::validation(format!("Invalid attachment URL: {}", e)))?;
    validate_attachment_name(&attachment.name)?;
    Ok(())
}

impl StoreState {
    /// Points the room's sidebar summary at its newest remaining message.
    fn refresh_last_message(&mut self, room_id: &str) {
        let latest = self
            .messages
            .iter()
            .rev()
            .find(|m| m.room_id == room_id)
            .map(summary);
        if let Some(room) = self.rooms.get_mut(room_id) {
            room.last_message = latest;
        }
    }
}

impl ChatStore {
    pub(crate) async fn send_message(
        &self,
        caller: &Caller,
        id: Option<String>,
        room_id: &str,
        content: &str,
        kind: MessageKind,
        attachment: Option<Attachment>,
    ) -> SessionResult<Message> {
        let max_length = self.config.max_message_length;
        let (content, attachment) = match (kind.is_attachment(), attachment) {
            (false, None) => {
                validate_message_content(content, max_length)?;
                (content.trim().to_string(), None)
            }
            (false, Some(_)) => {
                return Err(SessionError::validation(
                    "Text messages cannot carry attachments",
                ))
            }
            (true, None) => {
                return Err(SessionError::validation(
                    "Attachment is required for image and file messages",
                ))
            }
            (true, Some(attachment)) => {
                validate_attachment(&attachment)?;
                let caption = if content.trim().is_empty() {
                    attachment_caption(kind == MessageKind::Image).to_string()
                } else {
                    validate_message_content(content, max_length)?;
                    content.trim().to_string()
                };
                let attachment = Attachment {
                    url: attachment.url.trim().to_string(),
                    name: attachment.name.trim().to_string(),
                };
                (caption, Some(attachment))
            }
        };

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        state.member_room(room_id, &user_id)?;
        let id = assign_id(id, "Message", |id| state.message_index(id).is_ok())?;

        let message = Message {
            id,
            room_id: room_id.to_string(),
            author_id: user_id.clone(),
            author_name: state.username(&user_id),
            content,
            kind,
            attachment,
            created_at: chrono::Utc::now(),
            is_edited: false,
            edited_at: None,
            reactions: Vec::new(),
        };

        let room = state.room_mut(room_id)?;
        room.last_message = Some(summary(&message));
        for member in &room.members {
            if *member != user_id {
                *room.unread.entry(member.clone()).or_insert(0) += 1;
            }
        }
        state.messages.push(message.clone());

        self.emit(SessionEvent::Message {
            message: message.clone(),
        })
        .await;
        drop(guard);

        tracing::debug!("Message {} sent to room {} by {}", message.id, room_id, user_id);
        Ok(message)
    }

    pub(crate) async fn edit_message(
        &self,
        caller: &Caller,
        message_id: &str,
        content: &str,
    ) -> SessionResult<Message> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        let idx = state.message_index(message_id)?;

        if state.messages[idx].author_id != user_id {
            return Err(SessionError::permission("Not your message"));
        }
        validate_message_content(content, self.config.max_message_length)?;

        let now = chrono::Utc::now();
        let message = &mut state.messages[idx];
        message.content = content.trim().to_string();
        message.is_edited = true;
        message.edited_at = Some(now);
        let message = message.clone();

        let is_latest = state
            .rooms
            .get(&message.room_id)
            .and_then(|r| r.last_message.as_ref())
            .is_some_and(|last| last.message_id == message.id);
        if is_latest {
            state.refresh_last_message(&message.room_id);
        }

        self.emit(SessionEvent::MessageEdit {
            message_id: message.id.clone(),
            room_id: message.room_id.clone(),
            content: message.content.clone(),
            edited_at: now,
        })
        .await;
        drop(guard);

        tracing::debug!("Message {} edited by {}", message_id, user_id);
        Ok(message)
    }

    pub(crate) async fn delete_message(&self, caller: &Caller, message_id: &str) -> SessionResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        let idx = state.message_index(message_id)?;

        if state.messages[idx].author_id != user_id {
            return Err(SessionError::permission("Not your message"));
        }

        let message = state.messages.remove(idx);
        state.refresh_last_message(&message.room_id);

        self.emit(SessionEvent::MessageDelete {
            message_id: message.id,
            room_id: message.room_id,
        })
        .await;
        drop(guard);

        tracing::debug!("Message {} deleted by {}", message_id, user_id);
        Ok(())
    }

    /// Returns true if the caller's reaction is present afterwards.
    pub(crate) async fn toggle_reaction(
        &self,
        caller: &Caller,
        message_id: &str,
        emoji: &str,
    ) -> SessionResult<bool> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        let idx = state.message_index(message_id)?;
        validate_emoji(emoji)?;
        let emoji = emoji.trim();

        let room_id = state.messages[idx].room_id.clone();
        state.member_room(&room_id, &user_id)?;

        let added = state.messages[idx].toggle_reaction(&user_id, emoji);
        let event = if added {
            SessionEvent::ReactionAdd {
                message_id: message_id.to_string(),
                room_id,
                user_id: user_id.clone(),
                emoji: emoji.to_string(),
            }
        } else {
            SessionEvent::ReactionRemove {
                message_id: message_id.to_string(),
                room_id,
                user_id: user_id.clone(),
                emoji: emoji.to_string(),
            }
        };
        self.emit(event).await;
        drop(guard);

        tracing::debug!(
            "{} {} {} on message {}",
            user_id,
            if added { "added" } else { "removed" },
            emoji,
            message_id
        );
        Ok(added)
    }
}

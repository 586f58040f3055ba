use std::sync::Arc;

use super::{Caller, ChatStore};
use crate::error::SessionResult;
use crate::events::RemoteUpdate;

impl ChatStore {
    /// Folds a change reported by the sync collaborator into local state.
    /// Remote authors go through the same checks as local callers, so a
    /// rejected update leaves state untouched.
    pub async fn apply_remote(self: &Arc<Self>, update: RemoteUpdate) -> SessionResult<()> {
        let result = match update.clone() {
            RemoteUpdate::UserJoined { user_id, name, status } => {
                self.register_user(&user_id, &name, status).await.map(|_| ())
            }
            RemoteUpdate::Presence { user_id, status } => {
                self.set_status(&Caller::Remote(user_id), status).await
            }
            RemoteUpdate::UserLeft { user_id } => self.remove_user(&user_id).await,
            RemoteUpdate::MemberJoined { room_id, user_id } => {
                self.admit_member(&room_id, &user_id).await
            }
            RemoteUpdate::MemberLeft { room_id, user_id } => {
                self.leave_room(&Caller::Remote(user_id), &room_id).await
            }
            RemoteUpdate::RoomCreated {
                id,
                user_id,
                name,
                description,
                visibility,
            } => self
                .create_room(&Caller::Remote(user_id), id, &name, &description, visibility)
                .await
                .map(|_| ()),
            RemoteUpdate::MessagePosted {
                id,
                user_id,
                room_id,
                content,
                kind,
                attachment,
            } => self
                .send_message(
                    &Caller::Remote(user_id),
                    id,
                    &room_id,
                    &content,
                    kind,
                    attachment,
                )
                .await
                .map(|_| ()),
            RemoteUpdate::MessageEdited {
                user_id,
                message_id,
                content,
            } => self
                .edit_message(&Caller::Remote(user_id), &message_id, &content)
                .await
                .map(|_| ()),
            RemoteUpdate::MessageDeleted {
                user_id,
                message_id,
            } => {
                self.delete_message(&Caller::Remote(user_id), &message_id)
                    .await
            }
            RemoteUpdate::ReactionToggled {
                user_id,
                message_id,
                emoji,
            } => self
                .toggle_reaction(&Caller::Remote(user_id), &message_id, &emoji)
                .await
                .map(|_| ()),
            RemoteUpdate::Typing {
                user_id,
                room_id,
                active,
            } => {
                self.set_typing(&Caller::Remote(user_id), &room_id, active)
                    .await
            }
            RemoteUpdate::CallStarted {
                id,
                user_id,
                room_id,
                kind,
                media,
            } => self
                .start_call(&Caller::Remote(user_id), &room_id, kind, id, media)
                .await
                .map(|_| ()),
            RemoteUpdate::CallEnded { user_id } => self
                .end_call(&Caller::Remote(user_id))
                .await
                .map(|_| ()),
        };

        if let Err(e) = &result {
            tracing::warn!("Rejected remote update {:?}: {}", update, e);
        }
        result
    }
}

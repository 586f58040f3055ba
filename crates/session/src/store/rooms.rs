use std::collections::HashMap;

use huddle_shared::validation::{validate_room_description, validate_room_name};

use super::{assign_id, Caller, ChatStore, SessionId, StoreState};
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::models::{Call, Room, Visibility};

impl StoreState {
    /// Adds `user_id` to the room. Returns false if they were already in it.
    fn admit(&mut self, room_id: &str, user_id: &str) -> SessionResult<bool> {
        if !self.users.contains_key(user_id) {
            return Err(SessionError::user_not_found(user_id));
        }
        Ok(self.room_mut(room_id)?.add_member(user_id))
    }
}

impl ChatStore {
    pub(crate) async fn create_room(
        &self,
        caller: &Caller,
        id: Option<String>,
        name: &str,
        description: &str,
        visibility: Visibility,
    ) -> SessionResult<Room> {
        validate_room_name(name)?;
        validate_room_description(description)?;

        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        let id = assign_id(id, "Room", |id| state.rooms.contains_key(id))?;

        let description = description.trim();
        let room = Room {
            id,
            name: name.trim().to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
            visibility,
            members: vec![user_id.clone()],
            created_by: user_id,
            created_at: chrono::Utc::now(),
            last_message: None,
            unread: HashMap::new(),
        };

        state.room_order.push(room.id.clone());
        state.rooms.insert(room.id.clone(), room.clone());
        self.emit(SessionEvent::RoomCreated { room: room.clone() }).await;
        drop(guard);

        tracing::info!("Room {} ({}) created by {}", room.name, room.id, room.created_by);
        Ok(room)
    }

    pub(crate) async fn join_room(&self, caller: &Caller, room_id: &str) -> SessionResult<Room> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        if state.room(room_id)?.is_private() {
            return Err(SessionError::permission("Room is private"));
        }

        if state.admit(room_id, &user_id)? {
            self.emit(SessionEvent::MemberJoined {
                room_id: room_id.to_string(),
                user_id: user_id.clone(),
            })
            .await;
            tracing::info!("{} joined room {}", user_id, room_id);
        }
        state.room(room_id).cloned()
    }

    /// A member brings another existing user into the room, private or not.
    pub(crate) async fn invite(
        &self,
        caller: &Caller,
        room_id: &str,
        invitee_id: &str,
    ) -> SessionResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        state.member_room(room_id, &user_id)?;

        if state.admit(room_id, invitee_id)? {
            self.emit(SessionEvent::MemberJoined {
                room_id: room_id.to_string(),
                user_id: invitee_id.to_string(),
            })
            .await;
            tracing::info!("{} invited {} to room {}", user_id, invitee_id, room_id);
        }
        Ok(())
    }

    /// Membership granted elsewhere, e.g. reported by the sync collaborator.
    pub(crate) async fn admit_member(&self, room_id: &str, user_id: &str) -> SessionResult<()> {
        let mut state = self.state.write().await;
        if state.admit(room_id, user_id)? {
            self.emit(SessionEvent::MemberJoined {
                room_id: room_id.to_string(),
                user_id: user_id.to_string(),
            })
            .await;
        }
        Ok(())
    }

    pub(crate) async fn leave_room(&self, caller: &Caller, room_id: &str) -> SessionResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;

        let room = state.room_mut(room_id)?;
        if !room.remove_member(&user_id) {
            return Err(SessionError::NotFound {
                entity: "Membership",
                id: room_id.to_string(),
            });
        }

        let before = state.typing.len();
        state
            .typing
            .retain(|t| !(t.room_id == room_id && t.user_id == user_id));
        let stopped_typing = state.typing.len() != before;
        self.cancel_typing_timer(&(room_id.to_string(), user_id.clone()))
            .await;

        let mut ended: Option<Call> = None;
        if state
            .calls
            .get(room_id)
            .is_some_and(|c| c.started_by == user_id)
        {
            ended = state.calls.remove(room_id);
        }
        for slot in state.sessions.values_mut() {
            if slot.user_id != user_id {
                continue;
            }
            if slot.active_room.as_deref() == Some(room_id) {
                slot.active_room = None;
            }
            if ended.is_some() && slot.active_call.as_deref() == Some(room_id) {
                slot.active_call = None;
            }
        }

        if stopped_typing {
            let username = state.username(&user_id);
            self.emit(SessionEvent::Typing {
                room_id: room_id.to_string(),
                user_id: user_id.clone(),
                username,
                active: false,
            })
            .await;
        }
        if let Some(call) = ended {
            self.emit(SessionEvent::CallEnded {
                room_id: call.room_id,
                call_id: call.id,
            })
            .await;
        }
        self.emit(SessionEvent::MemberLeft {
            room_id: room_id.to_string(),
            user_id: user_id.clone(),
        })
        .await;
        drop(guard);

        tracing::info!("{} left room {}", user_id, room_id);
        Ok(())
    }

    /// Unknown rooms and rooms the user is not in both read as not found.
    pub(crate) async fn set_active_room(
        &self,
        session: SessionId,
        room_id: &str,
    ) -> SessionResult<Room> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.slot(session)?.user_id.clone();

        let room = state.room_mut(room_id)?;
        if !room.is_member(&user_id) {
            return Err(SessionError::room_not_found(room_id));
        }
        room.unread.remove(&user_id);
        let room = room.clone();

        state.slot_mut(session)?.active_room = Some(room_id.to_string());
        Ok(room)
    }
}

use super::{assign_id, Caller, ChatStore, StoreState};
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::models::{Call, CallKind, MediaSessionRef};

impl StoreState {
    /// Whether the caller already holds a call. Sessions track the call they
    /// started; remote authors are matched by who started it.
    fn holds_call(&self, caller: &Caller, user_id: &str) -> SessionResult<bool> {
        match caller {
            Caller::Session(session) => Ok(self.slot(*session)?.active_call.is_some()),
            Caller::Remote(_) => Ok(self.calls.values().any(|c| c.started_by == user_id)),
        }
    }

    /// Room of the call `caller` would end, if any.
    fn call_room_of(&mut self, caller: &Caller) -> SessionResult<Option<String>> {
        match caller {
            Caller::Session(session) => Ok(self.slot_mut(*session)?.active_call.take()),
            Caller::Remote(_) => {
                let user_id = self.caller_id(caller)?;
                Ok(self
                    .calls
                    .values()
                    .find(|c| c.started_by == user_id)
                    .map(|c| c.room_id.clone()))
            }
        }
    }
}

impl ChatStore {
    /// `id` and `media` are only given when folding a call another client
    /// already started.
    pub(crate) async fn start_call(
        &self,
        caller: &Caller,
        room_id: &str,
        kind: CallKind,
        id: Option<String>,
        media: Option<MediaSessionRef>,
    ) -> SessionResult<Call> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        let in_call = state.holds_call(caller, &user_id)?;

        state.member_room(room_id, &user_id)?;
        if state.calls.contains_key(room_id) {
            return Err(SessionError::conflict("A call is already active in this room"));
        }
        if in_call {
            return Err(SessionError::conflict("Already in a call"));
        }
        let id = assign_id(id, "Call", |id| state.calls.values().any(|c| c.id == id))?;

        let call = Call {
            id,
            room_id: room_id.to_string(),
            kind,
            started_by: user_id,
            started_at: chrono::Utc::now(),
            media: media.unwrap_or_default(),
        };
        state.calls.insert(room_id.to_string(), call.clone());
        if let Caller::Session(session) = caller {
            if let Some(slot) = state.sessions.get_mut(session) {
                slot.active_call = Some(room_id.to_string());
            }
        }

        self.emit(SessionEvent::CallStarted { call: call.clone() }).await;
        drop(guard);

        tracing::info!("{:?} call {} started in room {}", call.kind, call.id, room_id);
        Ok(call)
    }

    /// Returns the call that was ended, if there was one.
    pub(crate) async fn end_call(&self, caller: &Caller) -> SessionResult<Option<Call>> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let Some(room_id) = state.call_room_of(caller)? else {
            return Ok(None);
        };

        let call = state.calls.remove(&room_id);
        for slot in state.sessions.values_mut() {
            if slot.active_call.as_deref() == Some(room_id.as_str()) {
                slot.active_call = None;
            }
        }
        if let Some(call) = &call {
            self.emit(SessionEvent::CallEnded {
                room_id: call.room_id.clone(),
                call_id: call.id.clone(),
            })
            .await;
            tracing::info!("Call {} in room {} ended", call.id, call.room_id);
        }
        Ok(call)
    }
}

use std::sync::Arc;

use tokio::time::Instant;

use super::{Caller, ChatStore, TypingKey};
use crate::error::SessionResult;
use crate::events::SessionEvent;
use crate::models::TypingIndicator;

impl ChatStore {
    pub(crate) async fn set_typing(
        self: &Arc<Self>,
        caller: &Caller,
        room_id: &str,
        is_typing: bool,
    ) -> SessionResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        let user_id = state.caller_id(caller)?;
        state.member_room(room_id, &user_id)?;
        let key = (room_id.to_string(), user_id.clone());

        if is_typing {
            let generation = state.next_typing_generation();
            let username = state.username(&user_id);
            let existing = state
                .typing
                .iter()
                .position(|t| t.room_id == room_id && t.user_id == user_id);
            match existing {
                Some(idx) => {
                    let indicator = &mut state.typing[idx];
                    indicator.refreshed_at = Instant::now();
                    indicator.generation = generation;
                }
                None => state.typing.push(TypingIndicator {
                    room_id: room_id.to_string(),
                    user_id: user_id.clone(),
                    username: username.clone(),
                    refreshed_at: Instant::now(),
                    generation,
                }),
            }
            self.schedule_typing_expiry(key, generation).await;
            self.emit(SessionEvent::Typing {
                room_id: room_id.to_string(),
                user_id,
                username,
                active: true,
            })
            .await;
        } else {
            let before = state.typing.len();
            state
                .typing
                .retain(|t| !(t.room_id == room_id && t.user_id == user_id));
            self.cancel_typing_timer(&key).await;
            if state.typing.len() != before {
                let username = state.username(&user_id);
                self.emit(SessionEvent::Typing {
                    room_id: room_id.to_string(),
                    user_id,
                    username,
                    active: false,
                })
                .await;
            }
        }
        Ok(())
    }

    /// Replaces any pending expiry for `key`. The task only holds a weak
    /// reference, so it never keeps a dropped store alive.
    async fn schedule_typing_expiry(self: &Arc<Self>, key: TypingKey, generation: u64) {
        let mut timers = self.typing_timers.write().await;
        if let Some((_, handle)) = timers.remove(&key) {
            handle.abort();
        }

        let store = Arc::downgrade(self);
        let timeout = self.config.typing_timeout();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            if let Some(store) = store.upgrade() {
                store.expire_typing(task_key, generation).await;
            }
        });
        timers.insert(key, (generation, handle));
    }

    /// No-op unless the indicator is still the one this expiry was scheduled
    /// for. Covers refreshes, explicit stops, leaves and logouts.
    async fn expire_typing(&self, key: TypingKey, generation: u64) {
        let mut state = self.state.write().await;
        let pos = state.typing.iter().position(|t| {
            t.room_id == key.0 && t.user_id == key.1 && t.generation == generation
        });
        if let Some(pos) = pos {
            let indicator = state.typing.remove(pos);
            tracing::debug!(
                "Typing indicator for {} in {} expired",
                indicator.user_id,
                indicator.room_id
            );
            self.emit(SessionEvent::Typing {
                room_id: indicator.room_id,
                user_id: indicator.user_id,
                username: indicator.username,
                active: false,
            })
            .await;
        }
        drop(state);

        let mut timers = self.typing_timers.write().await;
        if timers.get(&key).is_some_and(|(g, _)| *g == generation) {
            timers.remove(&key);
        }
    }

    pub(crate) async fn cancel_typing_timer(&self, key: &TypingKey) {
        let mut timers = self.typing_timers.write().await;
        if let Some((_, handle)) = timers.remove(key) {
            handle.abort();
        }
    }

    pub(crate) async fn cancel_user_typing_timers(&self, user_id: &str) {
        let mut timers = self.typing_timers.write().await;
        timers.retain(|(_, uid), (_, handle)| {
            if uid == user_id {
                handle.abort();
                false
            } else {
                true
            }
        });
    }

    /// Number of expiries still scheduled.
    pub async fn pending_typing_timers(&self) -> usize {
        self.typing_timers.read().await.len()
    }
}

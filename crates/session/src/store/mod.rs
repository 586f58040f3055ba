mod broadcast;
mod calls;
mod messages;
mod remote;
mod rooms;
mod typing;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{mpsc, RwLock};
use tokio::task::JoinHandle;

use crate::config::SessionConfig;
use crate::error::{SessionError, SessionResult};
use crate::events::SessionEvent;
use crate::models::{Call, Message, Room, TypingIndicator, User, UserStatus};
use crate::session::ChatSession;
use crate::views::Snapshot;

pub type SessionId = u64;
pub type SubscriberId = u64;

/// (room_id, user_id)
type TypingKey = (String, String);

/// Who an operation is performed for. Local calls come through a session
/// slot; folded remote updates name their author directly.
#[derive(Debug, Clone)]
pub(crate) enum Caller {
    Session(SessionId),
    Remote(String),
}

#[derive(Debug, Clone)]
pub(crate) struct SessionSlot {
    pub user_id: String,
    pub active_room: Option<String>,
    /// room_id of the call this session started
    pub active_call: Option<String>,
}

#[derive(Default)]
pub(crate) struct StoreState {
    pub users: HashMap<String, User>,
    pub rooms: HashMap<String, Room>,
    /// Room ids in creation order.
    pub room_order: Vec<String>,
    /// Insertion order is chronological order.
    pub messages: Vec<Message>,
    /// Insertion order, at most one per (room, user).
    pub typing: Vec<TypingIndicator>,
    /// room_id -> call
    pub calls: HashMap<String, Call>,
    pub sessions: HashMap<SessionId, SessionSlot>,
    typing_generation: u64,
}

impl StoreState {
    pub fn caller_id(&self, caller: &Caller) -> SessionResult<String> {
        match caller {
            Caller::Session(id) => self
                .sessions
                .get(id)
                .map(|slot| slot.user_id.clone())
                .ok_or_else(|| SessionError::permission("Session has ended")),
            Caller::Remote(user_id) => {
                if self.users.contains_key(user_id) {
                    Ok(user_id.clone())
                } else {
                    Err(SessionError::user_not_found(user_id))
                }
            }
        }
    }

    pub fn slot(&self, session: SessionId) -> SessionResult<&SessionSlot> {
        self.sessions
            .get(&session)
            .ok_or_else(|| SessionError::permission("Session has ended"))
    }

    pub fn slot_mut(&mut self, session: SessionId) -> SessionResult<&mut SessionSlot> {
        self.sessions
            .get_mut(&session)
            .ok_or_else(|| SessionError::permission("Session has ended"))
    }

    pub fn room(&self, room_id: &str) -> SessionResult<&Room> {
        self.rooms
            .get(room_id)
            .ok_or_else(|| SessionError::room_not_found(room_id))
    }

    pub fn room_mut(&mut self, room_id: &str) -> SessionResult<&mut Room> {
        self.rooms
            .get_mut(room_id)
            .ok_or_else(|| SessionError::room_not_found(room_id))
    }

    /// The room, provided `user_id` belongs to it.
    pub fn member_room(&self, room_id: &str, user_id: &str) -> SessionResult<&Room> {
        let room = self.room(room_id)?;
        if !room.is_member(user_id) {
            return Err(SessionError::permission("Not a member of this room"));
        }
        Ok(room)
    }

    pub fn message_index(&self, message_id: &str) -> SessionResult<usize> {
        self.messages
            .iter()
            .position(|m| m.id == message_id)
            .ok_or_else(|| SessionError::message_not_found(message_id))
    }

    pub fn username(&self, user_id: &str) -> String {
        self.users
            .get(user_id)
            .map(|u| u.name.clone())
            .unwrap_or_default()
    }

    pub fn next_typing_generation(&mut self) -> u64 {
        self.typing_generation += 1;
        self.typing_generation
    }

    fn user_has_other_sessions(&self, user_id: &str, except: SessionId) -> bool {
        self.sessions
            .iter()
            .any(|(id, slot)| *id != except && slot.user_id == user_id)
    }
}

/// The id a remote author already assigned, or a fresh one. Ids are never
/// reused, so a taken id is a conflict.
fn assign_id(
    requested: Option<String>,
    entity: &str,
    taken: impl Fn(&str) -> bool,
) -> SessionResult<String> {
    match requested {
        None => Ok(uuid::Uuid::new_v4().to_string()),
        Some(id) if id.trim().is_empty() => Err(SessionError::validation(format!(
            "{} id must not be blank",
            entity
        ))),
        Some(id) if taken(&id) => Err(SessionError::conflict(format!(
            "{} {} already exists",
            entity, id
        ))),
        Some(id) => Ok(id),
    }
}

/// Single owner of all chat state. Hand out `ChatSession`s with `connect`
/// and share the store between them behind an `Arc`.
pub struct ChatStore {
    config: SessionConfig,
    next_id: RwLock<u64>,
    state: RwLock<StoreState>,
    subscribers: RwLock<HashMap<SubscriberId, mpsc::UnboundedSender<SessionEvent>>>,
    /// (room, user) -> (generation, pending expiry)
    typing_timers: RwLock<HashMap<TypingKey, (u64, JoinHandle<()>)>>,
}

impl ChatStore {
    pub fn new(config: SessionConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            next_id: RwLock::new(1),
            state: RwLock::new(StoreState::default()),
            subscribers: RwLock::new(HashMap::new()),
            typing_timers: RwLock::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    async fn next_id(&self) -> u64 {
        let mut id = self.next_id.write().await;
        let current = *id;
        *id += 1;
        current
    }

    /// Creates a new online user and opens a session for them.
    pub async fn connect(self: &Arc<Self>, name: &str) -> SessionResult<ChatSession> {
        huddle_shared::validation::validate_display_name(name)?;

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.trim().to_string(),
            status: UserStatus::Online,
        };
        let session_id = self.next_id().await;

        let mut state = self.state.write().await;
        state.users.insert(user.id.clone(), user.clone());
        state.sessions.insert(
            session_id,
            SessionSlot {
                user_id: user.id.clone(),
                active_room: None,
                active_call: None,
            },
        );
        self.emit(SessionEvent::Presence {
            user_id: user.id.clone(),
            status: user.status,
        })
        .await;
        drop(state);

        tracing::info!("{} ({}) connected", user.name, user.id);
        Ok(ChatSession::new(session_id, Arc::clone(self)))
    }

    /// Opens another session for an existing user, e.g. after a logout.
    pub async fn connect_as(self: &Arc<Self>, user_id: &str) -> SessionResult<ChatSession> {
        let session_id = self.next_id().await;

        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(user_id)
            .ok_or_else(|| SessionError::user_not_found(user_id))?;
        let came_online = user.status == UserStatus::Offline;
        if came_online {
            user.status = UserStatus::Online;
        }
        state.sessions.insert(
            session_id,
            SessionSlot {
                user_id: user_id.to_string(),
                active_room: None,
                active_call: None,
            },
        );
        if came_online {
            self.emit(SessionEvent::Presence {
                user_id: user_id.to_string(),
                status: UserStatus::Online,
            })
            .await;
        }
        drop(state);

        tracing::info!("User {} opened session {}", user_id, session_id);
        Ok(ChatSession::new(session_id, Arc::clone(self)))
    }

    /// Inserts or updates a user known from elsewhere.
    pub async fn register_user(
        &self,
        user_id: &str,
        name: &str,
        status: UserStatus,
    ) -> SessionResult<User> {
        huddle_shared::validation::validate_display_name(name)?;
        if user_id.trim().is_empty() {
            return Err(SessionError::validation("User id is required"));
        }

        let user = User {
            id: user_id.to_string(),
            name: name.trim().to_string(),
            status,
        };

        let mut state = self.state.write().await;
        state.users.insert(user.id.clone(), user.clone());
        self.emit(SessionEvent::Presence {
            user_id: user.id.clone(),
            status,
        })
        .await;
        Ok(user)
    }

    pub(crate) async fn set_status(&self, caller: &Caller, status: UserStatus) -> SessionResult<()> {
        let mut state = self.state.write().await;
        let user_id = state.caller_id(caller)?;
        let user = state
            .users
            .get_mut(&user_id)
            .ok_or_else(|| SessionError::user_not_found(&user_id))?;
        if user.status == status {
            return Ok(());
        }
        user.status = status;
        tracing::debug!("{} is now {}", user_id, status.as_str());
        self.emit(SessionEvent::Presence { user_id, status }).await;
        Ok(())
    }

    /// Disconnects a user for good: drops them from every room, typing set,
    /// reaction and call, and ends their sessions. Their messages stay.
    pub async fn remove_user(&self, user_id: &str) -> SessionResult<()> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        if state.users.remove(user_id).is_none() {
            return Err(SessionError::user_not_found(user_id));
        }

        let mut left_rooms = Vec::new();
        for room_id in &state.room_order {
            if let Some(room) = state.rooms.get_mut(room_id) {
                if room.remove_member(user_id) {
                    left_rooms.push(room_id.clone());
                }
            }
        }

        state.typing.retain(|t| t.user_id != user_id);
        for message in &mut state.messages {
            message.clear_reactions_by(user_id);
        }

        let ended: Vec<Call> = state
            .calls
            .values()
            .filter(|c| c.started_by == user_id)
            .cloned()
            .collect();
        for call in &ended {
            state.calls.remove(&call.room_id);
        }
        state.sessions.retain(|_, slot| slot.user_id != user_id);
        for slot in state.sessions.values_mut() {
            if slot
                .active_call
                .as_ref()
                .is_some_and(|room_id| ended.iter().any(|c| &c.room_id == room_id))
            {
                slot.active_call = None;
            }
        }

        self.cancel_user_typing_timers(user_id).await;

        for room_id in left_rooms {
            self.emit(SessionEvent::MemberLeft {
                room_id,
                user_id: user_id.to_string(),
            })
            .await;
        }
        for call in ended {
            self.emit(SessionEvent::CallEnded {
                room_id: call.room_id,
                call_id: call.id,
            })
            .await;
        }
        self.emit(SessionEvent::UserRemoved {
            user_id: user_id.to_string(),
        })
        .await;
        drop(guard);

        tracing::info!("Removed user {}", user_id);
        Ok(())
    }

    /// Ends one session and the call it started. Rooms and messages are left
    /// alone; once the user's last session is gone they go offline and their
    /// typing indicators are dropped.
    pub(crate) async fn logout(&self, session: SessionId) -> SessionResult<()> {
        let mut state = self.state.write().await;
        let slot = state
            .sessions
            .remove(&session)
            .ok_or_else(|| SessionError::permission("Session has ended"))?;
        let user_id = slot.user_id;

        let ended_call = slot
            .active_call
            .and_then(|room_id| state.calls.remove(&room_id));

        // Indicators are per user, not per session; another open session
        // keeps them until it stops typing or they expire.
        let went_offline = !state.user_has_other_sessions(&user_id, session);
        let mut stopped: Vec<TypingIndicator> = Vec::new();
        if went_offline {
            stopped = state
                .typing
                .iter()
                .filter(|t| t.user_id == user_id)
                .cloned()
                .collect();
            state.typing.retain(|t| t.user_id != user_id);
            self.cancel_user_typing_timers(&user_id).await;

            if let Some(user) = state.users.get_mut(&user_id) {
                user.status = UserStatus::Offline;
            }
        }

        if let Some(call) = ended_call {
            self.emit(SessionEvent::CallEnded {
                room_id: call.room_id,
                call_id: call.id,
            })
            .await;
        }
        for indicator in stopped {
            self.emit(SessionEvent::Typing {
                room_id: indicator.room_id,
                user_id: indicator.user_id,
                username: indicator.username,
                active: false,
            })
            .await;
        }
        if went_offline {
            self.emit(SessionEvent::Presence {
                user_id: user_id.clone(),
                status: UserStatus::Offline,
            })
            .await;
        }
        drop(state);

        tracing::info!("Session {} for user {} logged out", session, user_id);
        Ok(())
    }

    pub async fn snapshot(&self) -> Snapshot {
        let state = self.state.read().await;
        Snapshot {
            users: state.users.clone(),
            rooms: state
                .room_order
                .iter()
                .filter_map(|id| state.rooms.get(id).cloned())
                .collect(),
            messages: state.messages.clone(),
            typing: state.typing.clone(),
            calls: state.calls.values().cloned().collect(),
            taken_at: tokio::time::Instant::now(),
        }
    }

    pub(crate) async fn session_user(&self, session: SessionId) -> Option<User> {
        let state = self.state.read().await;
        let slot = state.sessions.get(&session)?;
        state.users.get(&slot.user_id).cloned()
    }

    pub(crate) async fn session_active_room(&self, session: SessionId) -> Option<Room> {
        let state = self.state.read().await;
        let room_id = state.sessions.get(&session)?.active_room.as_ref()?;
        state.rooms.get(room_id).cloned()
    }

    pub(crate) async fn session_active_call(&self, session: SessionId) -> Option<Call> {
        let state = self.state.read().await;
        let room_id = state.sessions.get(&session)?.active_call.as_ref()?;
        state.calls.get(room_id).cloned()
    }

    /// Teardown for the hosting shell: cancels every pending typing expiry
    /// and closes all subscriber channels. State stays readable.
    pub async fn shutdown(&self) {
        let mut timers = self.typing_timers.write().await;
        for (_, (_, handle)) in timers.drain() {
            handle.abort();
        }
        drop(timers);

        self.subscribers.write().await.clear();
        tracing::info!("Chat store shut down");
    }
}

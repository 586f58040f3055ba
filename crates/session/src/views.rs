//! Read-side queries. Everything here is a pure function of a [`Snapshot`],
//! so views can never drift from the state they were taken from.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use tokio::time::Instant;

use crate::models::{Call, Message, Room, TypingIndicator, User, UserStatus};

/// Owned copy of store state at one instant.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub users: HashMap<String, User>,
    /// Creation order.
    pub rooms: Vec<Room>,
    pub messages: Vec<Message>,
    pub typing: Vec<TypingIndicator>,
    pub calls: Vec<Call>,
    pub taken_at: Instant,
}

impl Snapshot {
    pub fn user(&self, user_id: &str) -> Option<&User> {
        self.users.get(user_id)
    }

    pub fn room(&self, room_id: &str) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == room_id)
    }

    pub fn message(&self, message_id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == message_id)
    }

    pub fn call_in(&self, room_id: &str) -> Option<&Call> {
        self.calls.iter().find(|c| c.room_id == room_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPartition {
    pub online: Vec<User>,
    /// Away and offline members.
    pub offline: Vec<User>,
}

impl MemberPartition {
    pub fn len(&self) -> usize {
        self.online.len() + self.offline.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rooms `user_id` belongs to whose name contains `search`, ignoring case.
pub fn rooms_for<'a>(snapshot: &'a Snapshot, user_id: &str, search: &str) -> Vec<&'a Room> {
    let needle = search.trim().to_lowercase();
    snapshot
        .rooms
        .iter()
        .filter(|room| room.is_member(user_id))
        .filter(|room| needle.is_empty() || room.name.to_lowercase().contains(&needle))
        .collect()
}

pub fn room_messages<'a>(snapshot: &'a Snapshot, room_id: &str) -> Vec<&'a Message> {
    snapshot
        .messages
        .iter()
        .filter(|m| m.room_id == room_id)
        .collect()
}

pub fn room_members(snapshot: &Snapshot, room_id: &str) -> MemberPartition {
    let Some(room) = snapshot.room(room_id) else {
        return MemberPartition::default();
    };

    let (online, offline): (Vec<User>, Vec<User>) = room
        .members
        .iter()
        .filter_map(|id| snapshot.user(id).cloned())
        .partition(|user| user.status == UserStatus::Online);
    MemberPartition { online, offline }
}

/// Live indicators in `room_id`, oldest first, one per user. Entries older
/// than `timeout` are dropped even if their expiry has not fired yet.
pub fn typing_in_room<'a>(
    snapshot: &'a Snapshot,
    room_id: &str,
    exclude_user: Option<&str>,
    timeout: Duration,
) -> Vec<&'a TypingIndicator> {
    let mut seen = HashSet::new();
    snapshot
        .typing
        .iter()
        .filter(|t| t.room_id == room_id)
        .filter(|t| exclude_user != Some(t.user_id.as_str()))
        .filter(|t| t.is_live(snapshot.taken_at, timeout))
        .filter(|t| seen.insert(t.user_id.clone()))
        .collect()
}

pub fn unread_count(snapshot: &Snapshot, room_id: &str, user_id: &str) -> u32 {
    snapshot
        .room(room_id)
        .map(|r| r.unread_for(user_id))
        .unwrap_or(0)
}

#![allow(dead_code)]

use std::sync::Arc;

use huddle_session::events::{RemoteUpdate, SessionEvent};
use huddle_session::models::{Room, UserStatus, Visibility};
use huddle_session::{ChatSession, ChatStore, SessionConfig};
use tokio::sync::mpsc;

/// Route library logs to the test harness. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "huddle_session=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn setup_store() -> Arc<ChatStore> {
    init_tracing();
    ChatStore::new(SessionConfig::default())
}

/// Store with alice and bob signed in.
pub async fn setup_pair() -> (Arc<ChatStore>, ChatSession, ChatSession) {
    let store = setup_store();
    let alice = store.connect("alice").await.unwrap();
    let bob = store.connect("bob").await.unwrap();
    (store, alice, bob)
}

/// Public room created by `owner` with `others` joined.
pub async fn create_room_with(owner: &ChatSession, name: &str, others: &[&ChatSession]) -> Room {
    let room = owner
        .create_room(name, "", Visibility::Public)
        .await
        .unwrap();
    for other in others {
        other.join_room(&room.id).await.unwrap();
    }
    room
}

/// Registers a user known only through remote updates and adds them to `room_id`.
pub async fn remote_member(store: &Arc<ChatStore>, room_id: &str, user_id: &str, name: &str) {
    store
        .register_user(user_id, name, UserStatus::Online)
        .await
        .unwrap();
    store
        .apply_remote(RemoteUpdate::MemberJoined {
            room_id: room_id.to_string(),
            user_id: user_id.to_string(),
        })
        .await
        .unwrap();
}

pub async fn user_id(session: &ChatSession) -> String {
    session.current_user().await.unwrap().id
}

pub fn drain(rx: &mut mpsc::UnboundedReceiver<SessionEvent>) -> Vec<SessionEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

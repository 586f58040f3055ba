mod common;

use huddle_session::models::CallKind;

#[tokio::test]
async fn second_call_in_room_conflicts_until_ended() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;

    let call = alice.start_call(&room.id, CallKind::Video).await.unwrap();
    assert_eq!(call.room_id, room.id);
    assert_eq!(call.kind, CallKind::Video);
    assert_eq!(alice.active_call().await.unwrap().id, call.id);

    let err = bob.start_call(&room.id, CallKind::Voice).await.unwrap_err();
    assert!(err.is_conflict());

    let ended = alice.end_call().await.unwrap().unwrap();
    assert_eq!(ended.id, call.id);
    assert!(alice.active_call().await.is_none());

    let next = bob.start_call(&room.id, CallKind::Voice).await.unwrap();
    assert_ne!(next.id, call.id);
    assert_ne!(next.media, call.media);
}

#[tokio::test]
async fn same_session_cannot_hold_two_calls() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let one = common::create_room_with(&alice, "one", &[]).await;
    let two = common::create_room_with(&alice, "two", &[]).await;

    alice.start_call(&one.id, CallKind::Voice).await.unwrap();
    let err = alice.start_call(&two.id, CallKind::Voice).await.unwrap_err();
    assert!(err.is_conflict());
}

#[tokio::test]
async fn start_call_errors() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;

    assert!(alice
        .start_call("missing", CallKind::Voice)
        .await
        .unwrap_err()
        .is_not_found());
    assert!(bob
        .start_call(&room.id, CallKind::Voice)
        .await
        .unwrap_err()
        .is_permission());
}

#[tokio::test]
async fn end_call_without_call_is_a_no_op() {
    let (_store, alice, _bob) = common::setup_pair().await;
    assert!(alice.end_call().await.unwrap().is_none());
}

#[tokio::test]
async fn logout_and_leave_end_the_call() {
    let (store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;

    alice.start_call(&room.id, CallKind::Voice).await.unwrap();
    alice.logout().await.unwrap();
    assert!(store.snapshot().await.call_in(&room.id).is_none());

    bob.start_call(&room.id, CallKind::Video).await.unwrap();
    bob.leave_room(&room.id).await.unwrap();
    assert!(store.snapshot().await.call_in(&room.id).is_none());
    assert!(bob.active_call().await.is_none());
}

#[tokio::test]
async fn audio_is_accepted_as_voice() {
    let kind: CallKind = serde_json::from_str("\"audio\"").unwrap();
    assert_eq!(kind, CallKind::Voice);
}

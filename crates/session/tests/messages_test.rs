mod common;

use huddle_session::models::{Attachment, MessageKind};

#[tokio::test]
async fn send_appends_without_touching_earlier_messages() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;

    let first = alice.send_text(&room.id, "hi").await.unwrap();
    let before = alice.messages(&room.id).await;

    let second = bob.send_text(&room.id, "hello").await.unwrap();
    let after = alice.messages(&room.id).await;

    assert_eq!(after.len(), 2);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[0].id, first.id);
    assert_eq!(after.last().unwrap().id, second.id);
    assert_eq!(second.author_name, "bob");
    assert!(!second.is_edited);
}

#[tokio::test]
async fn send_rejects_blank_text() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;

    let err = alice.send_text(&room.id, "  \n ").await.unwrap_err();
    assert!(err.is_validation());
    assert!(alice.messages(&room.id).await.is_empty());
}

#[tokio::test]
async fn send_to_unknown_room_is_not_found() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let err = alice.send_text("missing", "hi").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn send_requires_membership() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;

    let err = bob.send_text(&room.id, "let me in").await.unwrap_err();
    assert!(err.is_permission());
}

#[tokio::test]
async fn send_updates_last_message_and_unread() {
    let (store, alice, bob) = common::setup_pair().await;
    let carol = store.connect("carol").await.unwrap();
    let room = common::create_room_with(&alice, "general", &[&bob, &carol]).await;

    let sent = alice.send_text(&room.id, "standup in 5").await.unwrap();

    let snapshot = store.snapshot().await;
    let room = snapshot.room(&room.id).unwrap();
    let last = room.last_message.as_ref().unwrap();
    assert_eq!(last.message_id, sent.id);
    assert_eq!(last.author_name, "alice");
    assert_eq!(last.preview, "standup in 5");
    assert_eq!(bob.unread(&room.id).await, 1);
    assert_eq!(carol.unread(&room.id).await, 1);
    assert_eq!(alice.unread(&room.id).await, 0);
}

#[tokio::test]
async fn attachment_messages_get_default_caption() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;

    let image = alice
        .send_attachment(
            &room.id,
            "image/png",
            Attachment {
                url: "https://cdn.example.com/u/cat.png".into(),
                name: "cat.png".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(image.kind, MessageKind::Image);
    assert_eq!(image.content, "Shared an image");

    let file = alice
        .send_attachment(
            &room.id,
            "application/pdf",
            Attachment {
                url: "https://cdn.example.com/u/notes.pdf".into(),
                name: "notes.pdf".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(file.kind, MessageKind::File);
    assert_eq!(file.content, "Shared a file");
    assert_eq!(file.attachment.unwrap().name, "notes.pdf");
}

#[tokio::test]
async fn attachment_messages_are_validated() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;

    let missing = alice
        .send_message(&room.id, "", MessageKind::File, None)
        .await
        .unwrap_err();
    assert!(missing.is_validation());

    let bad_url = alice
        .send_message(
            &room.id,
            "",
            MessageKind::Image,
            Some(Attachment {
                url: "not a url".into(),
                name: "x.png".into(),
            }),
        )
        .await
        .unwrap_err();
    assert!(bad_url.is_validation());

    let text_with_file = alice
        .send_message(
            &room.id,
            "hi",
            MessageKind::Text,
            Some(Attachment {
                url: "https://cdn.example.com/a".into(),
                name: "a".into(),
            }),
        )
        .await
        .unwrap_err();
    assert!(text_with_file.is_validation());
    assert!(alice.messages(&room.id).await.is_empty());
}

#[tokio::test]
async fn author_edit_keeps_timestamp_and_position() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let original = alice.send_text(&room.id, "helo").await.unwrap();
    bob.send_text(&room.id, "typo?").await.unwrap();

    let edited = alice.edit_message(&original.id, "hello").await.unwrap();

    assert_eq!(edited.content, "hello");
    assert!(edited.is_edited);
    assert!(edited.edited_at.is_some());
    assert_eq!(edited.created_at, original.created_at);

    let messages = alice.messages(&room.id).await;
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].id, original.id);
    assert_eq!(messages[0].content, "hello");
}

#[tokio::test]
async fn non_author_edit_is_denied() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let msg = alice.send_text(&room.id, "mine").await.unwrap();

    let err = bob.edit_message(&msg.id, "ours").await.unwrap_err();
    assert!(err.is_permission());

    // even blank content reports the permission problem first
    let err = bob.edit_message(&msg.id, "").await.unwrap_err();
    assert!(err.is_permission());

    let messages = alice.messages(&room.id).await;
    assert_eq!(messages[0].content, "mine");
    assert!(!messages[0].is_edited);
}

#[tokio::test]
async fn edit_validation_and_missing_message() {
    let (_store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "text").await.unwrap();

    assert!(alice.edit_message(&msg.id, " ").await.unwrap_err().is_validation());
    assert!(alice.edit_message("gone", "x").await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn editing_latest_message_refreshes_preview() {
    let (store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "draft").await.unwrap();

    alice.edit_message(&msg.id, "final").await.unwrap();

    let snapshot = store.snapshot().await;
    let last = snapshot.room(&room.id).unwrap().last_message.clone().unwrap();
    assert_eq!(last.preview, "final");
}

#[tokio::test]
async fn deleted_message_disappears_from_reads() {
    let (store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let first = alice.send_text(&room.id, "first").await.unwrap();
    let second = alice.send_text(&room.id, "second").await.unwrap();

    alice.delete_message(&second.id).await.unwrap();

    let messages = bob.messages(&room.id).await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, first.id);

    let snapshot = store.snapshot().await;
    assert!(snapshot.message(&second.id).is_none());
    let last = snapshot.room(&room.id).unwrap().last_message.clone().unwrap();
    assert_eq!(last.message_id, first.id);

    assert!(alice.delete_message(&second.id).await.unwrap_err().is_not_found());
}

#[tokio::test]
async fn non_author_delete_is_denied() {
    let (_store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let msg = alice.send_text(&room.id, "keep me").await.unwrap();

    let err = bob.delete_message(&msg.id).await.unwrap_err();
    assert!(err.is_permission());
    assert_eq!(alice.messages(&room.id).await.len(), 1);
}

#[tokio::test]
async fn deleting_only_message_clears_preview() {
    let (store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "oops").await.unwrap();

    alice.delete_message(&msg.id).await.unwrap();

    let snapshot = store.snapshot().await;
    assert!(snapshot.room(&room.id).unwrap().last_message.is_none());
}

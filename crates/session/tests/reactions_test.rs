mod common;

use huddle_session::models::Visibility;

#[tokio::test]
async fn design_room_thumbs_up_toggle() {
    let (store, alice, bob) = common::setup_pair().await;
    let bob_id = common::user_id(&bob).await;

    let room = alice
        .create_room("Design", "", Visibility::Public)
        .await
        .unwrap();
    bob.join_room(&room.id).await.unwrap();
    let msg = alice.send_text(&room.id, "hi").await.unwrap();

    assert!(bob.add_reaction(&msg.id, "👍").await.unwrap());
    let snapshot = store.snapshot().await;
    let reactions = &snapshot.message(&msg.id).unwrap().reactions;
    assert_eq!(reactions.len(), 1);
    assert_eq!(reactions[0].emoji, "👍");
    assert_eq!(reactions[0].user_ids, vec![bob_id]);

    assert!(!bob.add_reaction(&msg.id, "👍").await.unwrap());
    let snapshot = store.snapshot().await;
    assert!(snapshot.message(&msg.id).unwrap().reactions.is_empty());
}

#[tokio::test]
async fn double_toggle_restores_original_state() {
    let (store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let msg = alice.send_text(&room.id, "ship it").await.unwrap();
    alice.add_reaction(&msg.id, "🚀").await.unwrap();

    let before = store.snapshot().await.message(&msg.id).cloned().unwrap();
    bob.add_reaction(&msg.id, "🚀").await.unwrap();
    bob.add_reaction(&msg.id, "🚀").await.unwrap();
    let after = store.snapshot().await.message(&msg.id).cloned().unwrap();

    assert_eq!(before, after);
}

#[tokio::test]
async fn reactions_keep_first_inserted_emoji_order() {
    let (store, alice, bob) = common::setup_pair().await;
    let alice_id = common::user_id(&alice).await;
    let bob_id = common::user_id(&bob).await;
    let room = common::create_room_with(&alice, "general", &[&bob]).await;
    let msg = alice.send_text(&room.id, "party").await.unwrap();

    bob.add_reaction(&msg.id, "🎉").await.unwrap();
    alice.add_reaction(&msg.id, "❤️").await.unwrap();
    alice.add_reaction(&msg.id, "🎉").await.unwrap();

    let snapshot = store.snapshot().await;
    let reactions = &snapshot.message(&msg.id).unwrap().reactions;
    let emoji: Vec<&str> = reactions.iter().map(|r| r.emoji.as_str()).collect();
    assert_eq!(emoji, vec!["🎉", "❤️"]);
    assert_eq!(reactions[0].user_ids, vec![bob_id, alice_id]);

    // dropping the first emoji entirely lets the next one move up
    bob.add_reaction(&msg.id, "🎉").await.unwrap();
    alice.add_reaction(&msg.id, "🎉").await.unwrap();
    let snapshot = store.snapshot().await;
    let emoji: Vec<String> = snapshot
        .message(&msg.id)
        .unwrap()
        .reactions
        .iter()
        .map(|r| r.emoji.clone())
        .collect();
    assert_eq!(emoji, vec!["❤️"]);
}

#[tokio::test]
async fn reaction_errors() {
    let (store, alice, bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "hi").await.unwrap();

    assert!(alice.add_reaction("missing", "👍").await.unwrap_err().is_not_found());
    assert!(alice.add_reaction(&msg.id, " ").await.unwrap_err().is_validation());
    assert!(bob.add_reaction(&msg.id, "👍").await.unwrap_err().is_permission());

    let snapshot = store.snapshot().await;
    assert!(snapshot.message(&msg.id).unwrap().reactions.is_empty());
}

#[tokio::test]
async fn palette_emoji_are_all_accepted() {
    let (store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "hi").await.unwrap();

    for emoji in huddle_shared::constants::REACTION_PALETTE {
        assert!(alice.add_reaction(&msg.id, emoji).await.unwrap());
    }

    let snapshot = store.snapshot().await;
    assert_eq!(
        snapshot.message(&msg.id).unwrap().reactions.len(),
        huddle_shared::constants::REACTION_PALETTE.len()
    );
}

#[tokio::test]
async fn multi_codepoint_emoji_is_accepted() {
    let (store, alice, _bob) = common::setup_pair().await;
    let room = common::create_room_with(&alice, "general", &[]).await;
    let msg = alice.send_text(&room.id, "family photo").await.unwrap();

    let family = "👩🏻‍👩🏻‍👧🏻‍👦🏻";
    assert!(family.len() > 32);
    assert!(alice.add_reaction(&msg.id, family).await.unwrap());

    let snapshot = store.snapshot().await;
    assert_eq!(snapshot.message(&msg.id).unwrap().reactions[0].emoji, family);
}

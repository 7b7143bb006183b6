use std::sync::Arc;

use dropzone::{
    item::types::PublishRequest, Classification, DropConfig, ItemKind, UpdateReason,
};
use dropzone::websockets::MessageType;

mod utils;

use utils::assertions::update_reason;
use utils::*;

#[tokio::test]
async fn test_publish_then_list_is_newest_first() {
    let setup = TestSetupBuilder::new().build().await;

    setup.publish_text("room-test", "A").await;
    setup.advance_seconds(1);
    setup.publish_text("room-test", "http://x").await;
    setup.advance_seconds(1);

    let items = setup.list("room-test").await;

    assert_eq!(items.len(), 2);
    assert_eq!(items[0].content, "http://x");
    assert_eq!(items[0].kind, ItemKind::Link);
    assert_eq!(items[1].content, "A");
    assert_eq!(items[1].kind, ItemKind::Text);
}

#[tokio::test]
async fn test_items_expire_after_default_ttl() {
    let setup = TestSetupBuilder::new().build().await;

    setup.publish_text("room-test", "ephemeral").await;
    assert_eq!(setup.list("room-test").await.len(), 1);

    setup.advance_minutes(31);

    assert!(setup.list("room-test").await.is_empty());
}

#[tokio::test]
async fn test_item_is_gone_at_exact_expiry_instant() {
    let setup = TestSetupBuilder::new().build().await;

    let item = setup.publish_text("room-test", "boundary").await;

    // One second before expiry: still visible
    setup.clock.set(item.expires_at - chrono::Duration::seconds(1));
    assert_eq!(setup.list("room-test").await.len(), 1);

    // At exactly expires_at: gone
    setup.clock.set(item.expires_at);
    assert!(setup.list("room-test").await.is_empty());
}

#[tokio::test]
async fn test_custom_ttl_is_respected() {
    let setup = TestSetupBuilder::new().build().await;

    let mut request = PublishRequest::text("short-lived");
    request.ttl_minutes = Some(5);
    setup
        .service
        .publish("room-test", request)
        .await
        .unwrap();

    setup.advance_minutes(4);
    assert_eq!(setup.list("room-test").await.len(), 1);

    setup.advance_minutes(2);
    assert!(setup.list("room-test").await.is_empty());
}

#[tokio::test]
async fn test_rooms_never_see_each_others_items() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["room-a", "room-b"])
        .build()
        .await;

    setup.publish_text("room-a", "only for a").await;
    setup.publish_text("room-b", "only for b").await;

    let room_a = setup.list("room-a").await;
    assert_eq!(room_a.len(), 1);
    assert_eq!(room_a[0].content, "only for a");

    let room_b = setup.list("room-b").await;
    assert_eq!(room_b.len(), 1);
    assert_eq!(room_b[0].content, "only for b");
}

#[tokio::test]
async fn test_clear_empties_one_room_and_spares_the_other() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["room-a", "room-b"])
        .build()
        .await;

    setup.publish_text("room-a", "a-1").await;
    setup.publish_text("room-a", "a-2").await;
    setup.publish_text("room-b", "b-1").await;

    let removed = setup.clear("room-a").await;

    assert_eq!(removed, 2);
    assert!(setup.list("room-a").await.is_empty());
    assert_eq!(setup.list("room-b").await.len(), 1);
}

#[tokio::test]
async fn test_concurrent_publishes_are_never_lost() {
    let setup = TestSetupBuilder::new().build().await;

    let handles = (0..10)
        .map(|n| {
            let service = Arc::clone(&setup.service);
            tokio::spawn(async move {
                service
                    .publish("room-test", PublishRequest::text(format!("burst-{}", n)))
                    .await
            })
        })
        .collect::<Vec<_>>();

    let results = futures::future::join_all(handles).await;
    assert!(results.into_iter().all(|r| r.unwrap().is_ok()));

    assert_eq!(setup.list("room-test").await.len(), 10);
}

#[tokio::test]
async fn test_unavailable_classifier_falls_back_to_heuristics() {
    // Default setup has no classifier configured at all
    let setup = TestSetupBuilder::new().build().await;

    let link = setup.publish_text("room-test", "https://example.com").await;
    let text = setup.publish_text("room-test", "hello world").await;

    assert_eq!(link.kind, ItemKind::Link);
    assert!(link.summary.is_none());
    assert_eq!(text.kind, ItemKind::Text);
    assert!(text.summary.is_none());
}

#[tokio::test]
async fn test_erroring_classifier_falls_back_to_heuristics() {
    let setup = TestSetupBuilder::new()
        .with_classifier(Arc::new(ScriptedClassifier::failing()))
        .build()
        .await;

    let long_note = "a rambling note that is clearly long enough to classify".to_string();
    let text = setup.publish_text("room-test", &long_note).await;

    assert_eq!(text.kind, ItemKind::Text);
    assert_eq!(text.content, long_note);
    assert!(text.summary.is_none());
}

#[tokio::test]
async fn test_classifier_enriches_long_text() {
    let setup = TestSetupBuilder::new()
        .with_classifier(Arc::new(ScriptedClassifier::succeeding(Classification {
            kind: ItemKind::Code,
            cleaned_content: "fn tidy() {}".to_string(),
            summary: Some("One tidy function".to_string()),
        })))
        .build()
        .await;

    let snippet = format!("fn tidy() {{}} // {}", "padding ".repeat(10));
    let item = setup.publish_text("room-test", &snippet).await;

    assert_eq!(item.kind, ItemKind::Code);
    assert_eq!(item.content, "fn tidy() {}");
    assert_eq!(item.summary.as_deref(), Some("One tidy function"));
}

#[tokio::test]
async fn test_publish_notifies_every_client_in_the_room() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["room-a", "room-b"])
        .with_client("alice", "room-a")
        .with_client("bob", "room-a")
        .with_client("carol", "room-b")
        .build()
        .await;

    setup.publish_text("room-a", "fresh item").await;

    let received = MessageAssertion::for_clients(&setup, vec!["alice", "bob"])
        .received_message_type(MessageType::ItemsUpdated)
        .await;
    assert!(received
        .iter()
        .all(|m| update_reason(m) == UpdateReason::Publish));

    MessageAssertion::for_clients(&setup, vec!["carol"])
        .received_no_messages()
        .await;
}

#[tokio::test]
async fn test_clear_notifies_the_room() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["room-test"])
        .with_client("alice", "room-test")
        .build()
        .await;

    setup.publish_text("room-test", "to be removed").await;
    setup.mock_conn_manager.clear_messages().await;

    setup.clear("room-test").await;

    let received = MessageAssertion::for_clients(&setup, vec!["alice"])
        .received_message_type(MessageType::ItemsUpdated)
        .await;
    assert_eq!(update_reason(&received[0]), UpdateReason::Clear);
}

#[tokio::test]
async fn test_oversized_file_is_rejected_and_nothing_is_stored() {
    let setup = TestSetupBuilder::new()
        .with_config(DropConfig {
            max_file_bytes: 128,
            ..DropConfig::default()
        })
        .build()
        .await;

    let mut request = PublishRequest::text("A".repeat(1024));
    request.file_name = Some("big.bin".to_string());

    let result = setup.service.publish("room-test", request).await;

    assert!(result.is_err());
    assert!(setup.list("room-test").await.is_empty());
    assert_eq!(setup.repository.item_count(), 0);
}

#[tokio::test]
async fn test_full_drop_zone_session() {
    let setup = TestSetupBuilder::new()
        .with_rooms(vec!["room-test"])
        .with_client("alice", "room-test")
        .build()
        .await;

    // t=0: share a note
    setup.publish_text("room-test", "A").await;
    // t=1s: share a link
    setup.advance_seconds(1);
    setup.publish_text("room-test", "http://x").await;

    // t=2s: everyone sees [link, text]
    setup.advance_seconds(1);
    let items = setup.list("room-test").await;
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].kind, ItemKind::Link);
    assert_eq!(items[1].kind, ItemKind::Text);

    MessageAssertion::for_clients(&setup, vec!["alice"])
        .received_message_type(MessageType::ItemsUpdated)
        .await;

    // Half an hour later the room has emptied itself
    setup.advance_minutes(31);
    assert!(setup.list("room-test").await.is_empty());
}

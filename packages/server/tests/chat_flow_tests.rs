//! End-to-end flows through the public API, without a database:
//! hub fan-out into a subscriber timeline, typing presence from
//! keystroke to remote indicator, unread badges reacting to live
//! events, and the suggestion bar lifecycle.

use chrono::{Duration, Utc};
use serde_json::json;

use server_core::common::{ContractId, MessageId};
use server_core::domains::chat::models::{ChatMessage, SenderRole};
use server_core::domains::chat::suggestion::{SuggestionBar, SuggestionErrorKind, SuggestionState};
use server_core::domains::chat::timeline::MessageTimeline;
use server_core::domains::chat::typing::{TypingEvent, TypingThrottle, TypingTracker};
use server_core::domains::chat::unread::{ReadAction, UnreadBadge};
use server_core::kernel::{chat_topic, typing_topic, ChatHub};

fn message(contract_id: ContractId, role: SenderRole, content: &str, offset_ms: i64) -> ChatMessage {
    ChatMessage {
        id: MessageId::new(),
        contract_id,
        sender_role: role.to_string(),
        content: content.to_string(),
        attachment_url: None,
        created_at: Utc::now() + Duration::milliseconds(offset_ms),
        read: false,
        metadata: None,
    }
}

#[tokio::test]
async fn live_events_and_history_merge_without_duplicates() {
    let hub = ChatHub::new();
    let contract = ContractId::new();
    let mut rx = hub.subscribe(&chat_topic(contract)).await;

    let history = vec![
        message(contract, SenderRole::Admin, "Guten Morgen!", 0),
        message(contract, SenderRole::User, "Guten Morgen zurück", 10),
    ];
    let live = message(contract, SenderRole::User, "Eine Frage noch", 20);

    // The live event races the bulk load; here it also lands in the
    // history response.
    hub.publish(
        &chat_topic(contract),
        json!({"type": "message_created", "message": &live}),
    )
    .await;

    let mut timeline = MessageTimeline::new();
    let event = rx.recv().await.unwrap();
    let from_stream: ChatMessage = serde_json::from_value(event["message"].clone()).unwrap();
    assert!(timeline.push(from_stream));

    let mut full_history = history.clone();
    full_history.push(live);
    timeline.hydrate(full_history);

    assert_eq!(timeline.len(), 3);
    let contents: Vec<_> = timeline.messages().iter().map(|m| m.content.as_str()).collect();
    assert_eq!(
        contents,
        vec!["Guten Morgen!", "Guten Morgen zurück", "Eine Frage noch"]
    );
}

#[tokio::test]
async fn conversation_streams_do_not_leak_into_each_other() {
    let hub = ChatHub::new();
    let contract_a = ContractId::new();
    let contract_b = ContractId::new();

    let mut rx_a = hub.subscribe(&chat_topic(contract_a)).await;
    let mut rx_b = hub.subscribe(&chat_topic(contract_b)).await;

    hub.publish(&chat_topic(contract_a), json!({"type": "message_created", "n": 1}))
        .await;

    assert!(rx_a.recv().await.is_ok());
    assert!(rx_b.try_recv().is_err());
}

#[tokio::test]
async fn typing_flows_from_keystrokes_to_remote_indicator() {
    let hub = ChatHub::new();
    let contract = ContractId::new();
    let mut rx = hub.subscribe(&typing_topic(contract)).await;

    let mut throttle = TypingThrottle::new();
    let t0 = Utc::now();

    // Rapid keystrokes; only the throttled subset is broadcast
    let drafts = [("H", 0), ("Ha", 100), ("Hal", 200), ("Hallo", 800)];
    for (draft, offset) in drafts {
        let event = TypingEvent::new(
            contract,
            SenderRole::User,
            draft.to_string(),
            t0 + Duration::milliseconds(offset),
        );
        if throttle.should_send(&event) {
            hub.publish(&typing_topic(contract), event.to_stream_value())
                .await;
        }
    }

    let mut tracker = TypingTracker::new();
    while let Ok(value) = rx.try_recv() {
        let event: TypingEvent = serde_json::from_value(value).unwrap();
        tracker.apply(event);
    }

    // Two broadcasts went out ("H" and "Hallo"); the latest wins
    let state = tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(1));
    assert_eq!(state.map(|e| e.draft_text.as_str()), Some("Hallo"));

    // Clearing the draft bypasses the throttle and removes the state
    let cleared = TypingEvent::new(
        contract,
        SenderRole::User,
        String::new(),
        t0 + Duration::milliseconds(900),
    );
    assert!(throttle.should_send(&cleared));
    tracker.apply(cleared);
    assert!(tracker
        .typing(contract, SenderRole::User, t0 + Duration::seconds(1))
        .is_none());
}

#[tokio::test]
async fn admin_badge_follows_the_global_firehose() {
    let hub = ChatHub::new();
    let mut global_rx = hub.subscribe_global();

    let contract = ContractId::new();
    let mut badge = UnreadBadge::new(SenderRole::Admin, 0);
    badge.on_close();

    hub.publish_global(json!({
        "type": "message_created",
        "message": message(contract, SenderRole::User, "Bin krank heute", 0),
    }));

    let event = global_rx.recv().await.unwrap();
    let incoming: ChatMessage = serde_json::from_value(event["message"].clone()).unwrap();
    let sender = incoming.role().unwrap();

    assert_eq!(badge.on_message(sender), ReadAction::None);
    assert_eq!(badge.count(), 1);

    // Opening the conversation clears the badge and asks for mark_read
    assert_eq!(badge.on_open(), ReadAction::MarkRead);
    assert_eq!(badge.count(), 0);
}

#[test]
fn suggestion_bar_full_lifecycle() {
    let mut bar = SuggestionBar::new();

    // Inbound employee message arms the bar
    assert!(bar.on_message(SenderRole::User));
    assert_eq!(bar.state(), &SuggestionState::Loading);

    // First attempt rate-limited; regenerate retries
    bar.fail(SuggestionErrorKind::RateLimited);
    assert!(bar.regenerate());

    bar.resolve("Gute Besserung! Bitte reichen Sie die Krankmeldung nach.".to_string());
    let draft = bar.accept().unwrap();
    assert!(draft.starts_with("Gute Besserung"));
    assert_eq!(bar.state(), &SuggestionState::Hidden);

    // The admin's own reply does not re-trigger the bar
    assert!(!bar.on_message(SenderRole::Admin));
}

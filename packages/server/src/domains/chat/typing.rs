//! Typing presence: ephemeral "who is typing what" signaling.
//!
//! Typing events ride their own hub topics and never touch durable
//! storage. Senders throttle keystroke broadcasts to bound channel
//! traffic; subscribers keep only the latest event per party and
//! expire it after a quiet period, since no server-side cleanup
//! exists. An empty draft is the explicit "cleared" signal and always
//! goes out immediately.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::common::ContractId;
use crate::domains::chat::models::SenderRole;

/// Quiet period after which a subscriber stops showing a typing state.
pub const TYPING_TTL_MS: i64 = 5_000;

/// Minimum interval between keystroke broadcasts per party.
pub const THROTTLE_INTERVAL_MS: i64 = 700;

/// One typing-presence broadcast. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingEvent {
    pub contract_id: ContractId,
    pub role: SenderRole,
    pub draft_text: String,
    pub sent_at: DateTime<Utc>,
}

impl TypingEvent {
    pub fn new(
        contract_id: ContractId,
        role: SenderRole,
        draft_text: String,
        sent_at: DateTime<Utc>,
    ) -> Self {
        Self {
            contract_id,
            role,
            draft_text,
            sent_at,
        }
    }

    /// Empty draft = the party stopped composing; remote indicators
    /// must disappear without waiting for the TTL.
    pub fn is_cleared(&self) -> bool {
        self.draft_text.is_empty()
    }

    /// Stream payload; `type` doubles as the SSE event name.
    pub fn to_stream_value(&self) -> serde_json::Value {
        json!({
            "type": "typing",
            "contract_id": self.contract_id,
            "role": self.role,
            "draft_text": self.draft_text,
            "sent_at": self.sent_at,
        })
    }
}

/// Sender-side keystroke throttle.
///
/// Not every keystroke is broadcast — only after `THROTTLE_INTERVAL_MS`
/// since the last send for that (conversation, role). Cleared events
/// bypass the throttle so indicators vanish promptly.
#[derive(Debug, Default)]
pub struct TypingThrottle {
    last_sent: HashMap<(ContractId, SenderRole), DateTime<Utc>>,
}

impl TypingThrottle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this event should be broadcast. Records the send time
    /// when it passes.
    pub fn should_send(&mut self, event: &TypingEvent) -> bool {
        let key = (event.contract_id, event.role);

        if event.is_cleared() {
            self.last_sent.remove(&key);
            return true;
        }

        match self.last_sent.get(&key) {
            Some(last) if (event.sent_at - *last).num_milliseconds() < THROTTLE_INTERVAL_MS => false,
            _ => {
                self.last_sent.insert(key, event.sent_at);
                true
            }
        }
    }
}

/// Subscriber-side typing state.
///
/// Keeps only the most recent event per (conversation, role);
/// out-of-order delivery is tolerated by never letting an older
/// timestamp overwrite a newer one. Entries expire client-side after
/// `TYPING_TTL_MS` with no further events.
#[derive(Debug, Default)]
pub struct TypingTracker {
    entries: HashMap<(ContractId, SenderRole), TypingEvent>,
}

impl TypingTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a received event: cleared removes, newer overwrites,
    /// stale is dropped.
    pub fn apply(&mut self, event: TypingEvent) {
        let key = (event.contract_id, event.role);

        if event.is_cleared() {
            self.entries.remove(&key);
            return;
        }

        match self.entries.get(&key) {
            Some(existing) if existing.sent_at > event.sent_at => {}
            _ => {
                self.entries.insert(key, event);
            }
        }
    }

    /// The live typing state for one party, if not expired at `now`.
    pub fn typing(
        &self,
        contract_id: ContractId,
        role: SenderRole,
        now: DateTime<Utc>,
    ) -> Option<&TypingEvent> {
        self.entries
            .get(&(contract_id, role))
            .filter(|event| (now - event.sent_at).num_milliseconds() < TYPING_TTL_MS)
    }

    /// All unexpired typing states at `now`.
    pub fn active(&self, now: DateTime<Utc>) -> Vec<&TypingEvent> {
        self.entries
            .values()
            .filter(|event| (now - event.sent_at).num_milliseconds() < TYPING_TTL_MS)
            .collect()
    }

    /// Drop expired entries (housekeeping).
    pub fn expire(&mut self, now: DateTime<Utc>) {
        self.entries.retain(|_, event| (now - event.sent_at).num_milliseconds() < TYPING_TTL_MS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(
        contract_id: ContractId,
        role: SenderRole,
        draft: &str,
        sent_at: DateTime<Utc>,
    ) -> TypingEvent {
        TypingEvent::new(contract_id, role, draft.to_string(), sent_at)
    }

    #[test]
    fn throttle_passes_first_event_and_blocks_rapid_followups() {
        let mut throttle = TypingThrottle::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        assert!(throttle.should_send(&event(contract, SenderRole::User, "H", t0)));
        assert!(!throttle.should_send(&event(
            contract,
            SenderRole::User,
            "Ha",
            t0 + Duration::milliseconds(100)
        )));
        assert!(throttle.should_send(&event(
            contract,
            SenderRole::User,
            "Hallo",
            t0 + Duration::milliseconds(800)
        )));
    }

    #[test]
    fn throttle_tracks_parties_independently() {
        let mut throttle = TypingThrottle::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        assert!(throttle.should_send(&event(contract, SenderRole::User, "a", t0)));
        assert!(throttle.should_send(&event(contract, SenderRole::Admin, "b", t0)));
    }

    #[test]
    fn cleared_event_bypasses_throttle() {
        let mut throttle = TypingThrottle::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        assert!(throttle.should_send(&event(contract, SenderRole::User, "Hallo", t0)));
        assert!(throttle.should_send(&event(
            contract,
            SenderRole::User,
            "",
            t0 + Duration::milliseconds(50)
        )));
    }

    #[test]
    fn tracker_shows_latest_draft() {
        let mut tracker = TypingTracker::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        tracker.apply(event(contract, SenderRole::User, "Hal", t0));
        tracker.apply(event(
            contract,
            SenderRole::User,
            "Hallo",
            t0 + Duration::seconds(1),
        ));

        let state = tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(2));
        assert_eq!(state.map(|e| e.draft_text.as_str()), Some("Hallo"));
    }

    #[test]
    fn tracker_drops_out_of_order_events() {
        let mut tracker = TypingTracker::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        tracker.apply(event(contract, SenderRole::User, "newer", t0 + Duration::seconds(1)));
        tracker.apply(event(contract, SenderRole::User, "older", t0));

        let state = tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(2));
        assert_eq!(state.map(|e| e.draft_text.as_str()), Some("newer"));
    }

    #[test]
    fn entry_expires_after_ttl_without_new_events() {
        let mut tracker = TypingTracker::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        tracker.apply(event(contract, SenderRole::User, "Hallo", t0));

        assert!(tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(4)).is_some());
        assert!(tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(6)).is_none());
    }

    #[test]
    fn cleared_event_removes_entry_immediately() {
        let mut tracker = TypingTracker::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        tracker.apply(event(contract, SenderRole::User, "Hallo", t0));
        tracker.apply(event(contract, SenderRole::User, "", t0 + Duration::seconds(1)));

        assert!(tracker.typing(contract, SenderRole::User, t0 + Duration::seconds(1)).is_none());
    }

    #[test]
    fn expire_prunes_stale_entries() {
        let mut tracker = TypingTracker::new();
        let contract = ContractId::new();
        let t0 = Utc::now();

        tracker.apply(event(contract, SenderRole::User, "alt", t0));
        tracker.apply(event(
            contract,
            SenderRole::Admin,
            "frisch",
            t0 + Duration::seconds(4),
        ));

        tracker.expire(t0 + Duration::seconds(6));
        assert_eq!(tracker.active(t0 + Duration::seconds(6)).len(), 1);
    }

    #[test]
    fn stream_value_uses_typing_event_name() {
        let e = event(ContractId::new(), SenderRole::Admin, "Moment…", Utc::now());
        let value = e.to_stream_value();

        assert_eq!(value["type"], "typing");
        assert_eq!(value["role"], "admin");
        assert_eq!(value["draft_text"], "Moment…");
    }
}

//! In-process pub/sub hub for realtime chat delivery.
//!
//! Topic-keyed broadcast channels push events to SSE endpoints. Two
//! topic namespaces share the hub: `chat:{contract_id}` for persisted
//! message events and `typing:{contract_id}` for ephemeral typing
//! presence. A separate global firehose receives every message event
//! system-wide and drives admin conversation-list re-aggregation.
//!
//! Subscribers only receive events published after they subscribe;
//! history comes from a bulk load against the message store.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

/// Topic for a conversation's message events.
pub fn chat_topic(contract_id: impl std::fmt::Display) -> String {
    format!("chat:{}", contract_id)
}

/// Topic for a conversation's typing-presence events.
pub fn typing_topic(contract_id: impl std::fmt::Display) -> String {
    format!("typing:{}", contract_id)
}

/// Topic-keyed pub/sub hub with a global firehose.
///
/// Thread-safe, cloneable. Payloads are `serde_json::Value` — the
/// chat domain serializes its own types.
#[derive(Clone)]
pub struct ChatHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    firehose: broadcast::Sender<serde_json::Value>,
    capacity: usize,
}

impl ChatHub {
    /// Create a hub with default capacity (256 events per channel).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Create a hub with the given channel capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        let (firehose, _) = broadcast::channel(capacity);
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            firehose,
            capacity,
        }
    }

    /// Publish to a topic. No-op if the topic has no subscribers.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) {
        let channels = self.channels.read().await;
        if let Some(tx) = channels.get(topic) {
            // Send errors mean no active receivers
            let _ = tx.send(value);
        }
    }

    /// Publish to the global firehose. Every appended message lands
    /// here regardless of conversation, so list views can react to
    /// system-wide activity.
    pub fn publish_global(&self, value: serde_json::Value) {
        let _ = self.firehose.send(value);
    }

    /// Subscribe to a topic. Creates the channel if it doesn't exist.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        let tx = channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0);
        tx.subscribe()
    }

    /// Subscribe to the global firehose.
    pub fn subscribe_global(&self) -> broadcast::Receiver<serde_json::Value> {
        self.firehose.subscribe()
    }

    /// Remove channels with zero subscribers (housekeeping).
    pub async fn cleanup(&self) {
        let mut channels = self.channels.write().await;
        channels.retain(|_, tx| tx.receiver_count() > 0);
    }
}

impl Default for ChatHub {
    fn default() -> Self {
        Self::new()
    }
}

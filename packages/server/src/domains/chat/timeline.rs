//! Subscriber-side message timeline.
//!
//! Merges the initial bulk load with live fan-out events into one
//! ordered view. The transport may replay an event after a reconnect,
//! so any message whose ID is already present is rejected. Display
//! order follows `created_at` with arrival order breaking ties.

use std::collections::HashSet;

use crate::common::MessageId;
use crate::domains::chat::models::ChatMessage;

#[derive(Debug, Default)]
pub struct MessageTimeline {
    messages: Vec<ChatMessage>,
    seen: HashSet<MessageId>,
}

impl MessageTimeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the timeline from a bulk `load` (already ascending).
    pub fn hydrate(&mut self, history: Vec<ChatMessage>) {
        for message in history {
            self.push(message);
        }
    }

    /// Apply one live event. Returns false for duplicates.
    pub fn push(&mut self, message: ChatMessage) -> bool {
        if !self.seen.insert(message.id) {
            return false;
        }

        // Late-arriving older messages slot in by timestamp; equal
        // timestamps keep arrival order.
        let at = self
            .messages
            .iter()
            .rposition(|m| m.created_at <= message.created_at)
            .map(|i| i + 1)
            .unwrap_or(0);
        self.messages.insert(at, message);
        true
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The newest message, if any.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }
}

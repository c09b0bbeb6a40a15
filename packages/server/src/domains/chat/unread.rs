//! Unread badge bookkeeping.
//!
//! Tracks, per conversation and viewing role, how many messages from
//! the other party are unread. Pure state machine — the store calls
//! (`count_unread` on mount, `mark_read` when the badge resets) are
//! performed by the caller when a transition asks for them.
//!
//! Two states per conversation-viewer pair: `unseen` (count > 0) and
//! `seen` (count = 0). Opening or focusing the conversation while the
//! document is visible resets to `seen`; a counterpart message
//! arriving while unfocused or hidden moves to `unseen`. A message
//! arriving while the conversation is open and focused short-circuits
//! straight to mark-read and never bumps the visible counter.

use crate::domains::chat::models::SenderRole;

/// What the caller must do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadAction {
    /// Call `ChatMessage::mark_read` for the counterpart's messages.
    MarkRead,
    /// Nothing to persist.
    None,
}

/// Unread state for one conversation as seen by one viewer role.
#[derive(Debug)]
pub struct UnreadBadge {
    viewer: SenderRole,
    count: i64,
    open: bool,
    focused: bool,
    document_visible: bool,
}

impl UnreadBadge {
    /// Start from the stored unread count (`count_unread` at mount).
    /// The conversation starts closed, with the window focused and
    /// visible.
    pub fn new(viewer: SenderRole, initial_count: i64) -> Self {
        Self {
            viewer,
            count: initial_count,
            open: false,
            focused: true,
            document_visible: true,
        }
    }

    /// Current badge value.
    pub fn count(&self) -> i64 {
        self.count
    }

    fn actively_viewing(&self) -> bool {
        self.open && self.focused && self.document_visible
    }

    /// The viewer opened the conversation.
    pub fn on_open(&mut self) -> ReadAction {
        self.open = true;
        self.reset_if_viewing()
    }

    /// The viewer navigated away.
    pub fn on_close(&mut self) {
        self.open = false;
    }

    /// The window regained focus.
    pub fn on_focus(&mut self) -> ReadAction {
        self.focused = true;
        self.reset_if_viewing()
    }

    /// The window lost focus.
    pub fn on_blur(&mut self) {
        self.focused = false;
    }

    /// Background-tab detection.
    pub fn on_visibility_change(&mut self, visible: bool) -> ReadAction {
        self.document_visible = visible;
        if visible {
            self.reset_if_viewing()
        } else {
            ReadAction::None
        }
    }

    /// A new message arrived in this conversation.
    pub fn on_message(&mut self, sender: SenderRole) -> ReadAction {
        // Only counterpart messages are directed at this viewer
        if self.viewer.counterpart() != Some(sender) {
            return ReadAction::None;
        }

        if self.actively_viewing() {
            // Seen immediately; never shows on the badge
            ReadAction::MarkRead
        } else {
            self.count += 1;
            ReadAction::None
        }
    }

    fn reset_if_viewing(&mut self) -> ReadAction {
        if self.actively_viewing() {
            self.count = 0;
            ReadAction::MarkRead
        } else {
            ReadAction::None
        }
    }
}

//! Suggestion bar state for the admin console.
//!
//! Models the lifecycle of one AI reply suggestion next to the
//! compose input: requested when a new employee message arrives,
//! accepted into the draft, regenerated, or dismissed until the next
//! inbound message re-triggers it. Purely advisory — a failure here
//! never affects ordinary messaging.

use crate::domains::chat::models::SenderRole;

/// Distinct failure kinds, each with its own user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionErrorKind {
    RateLimited,
    QuotaExhausted,
    Gateway,
}

impl SuggestionErrorKind {
    /// Text shown in the dismissible error banner.
    pub fn user_message(&self) -> &'static str {
        match self {
            SuggestionErrorKind::RateLimited => {
                "Zu viele Anfragen. Bitte versuchen Sie es in Kürze erneut."
            }
            SuggestionErrorKind::QuotaExhausted => {
                "Das KI-Kontingent ist aufgebraucht. Bitte Abrechnung prüfen."
            }
            SuggestionErrorKind::Gateway => {
                "Der Vorschlag konnte nicht geladen werden."
            }
        }
    }
}

/// State of one suggestion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionState {
    Hidden,
    Loading,
    Ready(String),
    Error(SuggestionErrorKind),
}

/// Suggestion bar next to the admin compose input.
#[derive(Debug)]
pub struct SuggestionBar {
    state: SuggestionState,
    dismissed: bool,
}

impl Default for SuggestionBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SuggestionBar {
    pub fn new() -> Self {
        Self {
            state: SuggestionState::Hidden,
            dismissed: false,
        }
    }

    pub fn state(&self) -> &SuggestionState {
        &self.state
    }

    /// A message arrived in the open conversation. Returns true when a
    /// suggestion request should be issued: only employee messages
    /// re-trigger the bar, and they also clear a previous dismissal.
    pub fn on_message(&mut self, sender: SenderRole) -> bool {
        if sender != SenderRole::User {
            return false;
        }
        self.dismissed = false;
        self.state = SuggestionState::Loading;
        true
    }

    /// Explicit regenerate. Returns true when a request should go out
    /// (not while dismissed).
    pub fn regenerate(&mut self) -> bool {
        if self.dismissed {
            return false;
        }
        self.state = SuggestionState::Loading;
        true
    }

    /// A request resolved with text.
    pub fn resolve(&mut self, suggestion: String) {
        if !self.dismissed {
            self.state = SuggestionState::Ready(suggestion);
        }
    }

    /// A request failed.
    pub fn fail(&mut self, kind: SuggestionErrorKind) {
        if !self.dismissed {
            self.state = SuggestionState::Error(kind);
        }
    }

    /// Accept the suggestion: returns the text to copy into the
    /// compose input and hides the bar. Nothing is sent.
    pub fn accept(&mut self) -> Option<String> {
        match std::mem::replace(&mut self.state, SuggestionState::Hidden) {
            SuggestionState::Ready(text) => Some(text),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Hide the bar until the next inbound employee message.
    pub fn dismiss(&mut self) {
        self.dismissed = true;
        self.state = SuggestionState::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inbound_employee_message_triggers_loading() {
        let mut bar = SuggestionBar::new();

        assert!(bar.on_message(SenderRole::User));
        assert_eq!(bar.state(), &SuggestionState::Loading);
    }

    #[test]
    fn admin_and_system_messages_do_not_trigger() {
        let mut bar = SuggestionBar::new();

        assert!(!bar.on_message(SenderRole::Admin));
        assert!(!bar.on_message(SenderRole::System));
        assert_eq!(bar.state(), &SuggestionState::Hidden);
    }

    #[test]
    fn accept_copies_text_and_hides_bar() {
        let mut bar = SuggestionBar::new();
        bar.on_message(SenderRole::User);
        bar.resolve("Vielen Dank, wir melden uns.".to_string());

        let accepted = bar.accept();
        assert_eq!(accepted.as_deref(), Some("Vielen Dank, wir melden uns."));
        assert_eq!(bar.state(), &SuggestionState::Hidden);
    }

    #[test]
    fn accept_without_ready_suggestion_is_noop() {
        let mut bar = SuggestionBar::new();
        bar.on_message(SenderRole::User);

        assert_eq!(bar.accept(), None);
        assert_eq!(bar.state(), &SuggestionState::Loading);
    }

    #[test]
    fn dismiss_holds_until_next_inbound_message() {
        let mut bar = SuggestionBar::new();
        bar.on_message(SenderRole::User);
        bar.resolve("Hallo".to_string());

        bar.dismiss();
        assert_eq!(bar.state(), &SuggestionState::Hidden);
        assert!(!bar.regenerate());

        // A late response for the dismissed request stays hidden
        bar.resolve("Hallo nochmal".to_string());
        assert_eq!(bar.state(), &SuggestionState::Hidden);

        // The next employee message re-arms the bar
        assert!(bar.on_message(SenderRole::User));
        assert_eq!(bar.state(), &SuggestionState::Loading);
    }

    #[test]
    fn failure_kinds_have_distinct_messages() {
        let mut bar = SuggestionBar::new();
        bar.on_message(SenderRole::User);
        bar.fail(SuggestionErrorKind::QuotaExhausted);

        let SuggestionState::Error(kind) = bar.state() else {
            panic!("expected error state");
        };
        assert_ne!(
            kind.user_message(),
            SuggestionErrorKind::Gateway.user_message()
        );
        assert_ne!(
            kind.user_message(),
            SuggestionErrorKind::RateLimited.user_message()
        );
    }

    #[test]
    fn regenerate_reissues_after_error() {
        let mut bar = SuggestionBar::new();
        bar.on_message(SenderRole::User);
        bar.fail(SuggestionErrorKind::RateLimited);

        assert!(bar.regenerate());
        assert_eq!(bar.state(), &SuggestionState::Loading);
    }
}

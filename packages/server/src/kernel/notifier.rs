//! Staff notification dispatch.
//!
//! Fires a webhook when an employee sends a chat message so staff get
//! alerted outside the admin console. Dispatch is fire-and-forget:
//! nothing awaits the result and failures are logged and swallowed —
//! a dead webhook must never block or fail message appends.

use serde::Serialize;
use tracing::{debug, warn};

/// Maximum preview length in characters before truncation.
const PREVIEW_MAX_CHARS: usize = 100;

/// Event type sent for new employee chat messages.
pub const CHAT_MESSAGE_EVENT: &str = "chat_nachricht";

#[derive(Debug, Serialize)]
struct NotifyPayload<'a> {
    event_type: &'a str,
    message: &'a str,
}

/// Outbound staff-alert webhook client.
#[derive(Clone)]
pub struct StaffNotifier {
    http_client: reqwest::Client,
    webhook_url: Option<String>,
}

impl StaffNotifier {
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            webhook_url,
        }
    }

    /// Dispatch a notification without awaiting delivery.
    ///
    /// Spawned onto the runtime; the caller continues immediately.
    pub fn dispatch(&self, event_type: &str, message: &str) {
        let Some(url) = self.webhook_url.clone() else {
            debug!("Staff notification skipped: no webhook configured");
            return;
        };

        let client = self.http_client.clone();
        let event_type = event_type.to_string();
        let message = message.to_string();

        tokio::spawn(async move {
            let payload = NotifyPayload {
                event_type: &event_type,
                message: &message,
            };

            match client.post(&url).json(&payload).send().await {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "Staff notification webhook returned an error");
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(error = %e, "Staff notification webhook failed");
                }
            }
        });
    }

    /// Notify staff about a new employee message with a truncated
    /// content preview.
    pub fn notify_employee_message(&self, content: &str) {
        let preview = truncate_preview(content);
        self.dispatch(CHAT_MESSAGE_EVENT, &preview);
    }
}

/// Truncate message content for the notification preview: first 100
/// characters followed by an ellipsis. Char-based, so multi-byte text
/// never splits mid-character.
pub fn truncate_preview(content: &str) -> String {
    if content.chars().count() <= PREVIEW_MAX_CHARS {
        content.to_string()
    } else {
        let mut preview: String = content.chars().take(PREVIEW_MAX_CHARS).collect();
        preview.push('…');
        preview
    }
}

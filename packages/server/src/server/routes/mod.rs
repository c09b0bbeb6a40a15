//! HTTP route handlers.

pub mod conversations;
pub mod health;
pub mod messages;
pub mod stream;
pub mod suggest;
pub mod typing;

pub use conversations::list_conversations_handler;
pub use health::health_handler;
pub use messages::{append_handler, load_handler, mark_read_handler, unread_handler};
pub use stream::{chat_stream_handler, global_stream_handler, typing_stream_handler};
pub use suggest::suggest_handler;
pub use typing::typing_handler;

use serde::Serialize;

/// Uniform error payload for JSON endpoints.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

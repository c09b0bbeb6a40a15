pub mod aggregate;
pub mod append_message;
pub mod suggest_reply;

pub use aggregate::{aggregate_conversations, ConversationSummary};
pub use append_message::{append_message, AppendError};
pub use suggest_reply::{suggest_reply, SuggestError};

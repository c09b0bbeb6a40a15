//! API data types for the chat endpoints.

use serde::{Deserialize, Serialize};

use crate::domains::chat::actions::ConversationSummary;
use crate::domains::chat::models::{ChatMessage, MessageMetadata};

/// Wire representation of a chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageData {
    /// Unique identifier
    pub id: String,

    /// Conversation (employment contract) this message belongs to
    pub contract_id: String,

    /// Role: admin, user, system
    pub sender_role: String,

    /// Message content (may be empty with an attachment)
    pub content: String,

    /// Optional uploaded file URL
    pub attachment_url: Option<String>,

    /// When the message was created (ISO 8601)
    pub created_at: String,

    /// Whether the other party has seen this message
    pub read: bool,

    /// Structured payload for system cards
    pub metadata: Option<MessageMetadata>,
}

impl From<ChatMessage> for MessageData {
    fn from(m: ChatMessage) -> Self {
        Self {
            id: m.id.to_string(),
            contract_id: m.contract_id.to_string(),
            sender_role: m.sender_role,
            content: m.content,
            attachment_url: m.attachment_url,
            created_at: m.created_at.to_rfc3339(),
            read: m.read,
            metadata: m.metadata.map(|j| j.0),
        }
    }
}

/// Wire representation of an admin conversation summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummaryData {
    pub contract_id: String,
    pub employee_name: String,
    pub last_message: String,
    pub last_message_at: String,
    pub unread_count: i64,
}

impl From<ConversationSummary> for ConversationSummaryData {
    fn from(s: ConversationSummary) -> Self {
        Self {
            contract_id: s.contract_id.to_string(),
            employee_name: s.employee_name,
            last_message: s.last_message,
            last_message_at: s.last_message_at.to_rfc3339(),
            unread_count: s.unread_count,
        }
    }
}

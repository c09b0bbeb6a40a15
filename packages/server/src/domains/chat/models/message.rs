use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::PgPool;

use crate::common::{ContractId, MessageId};

/// Default window for the initial history load. Older messages are
/// not paginated in this design.
pub const DEFAULT_LOAD_LIMIT: i64 = 50;

/// ChatMessage - one unit of chat communication, keyed by the
/// employment contract it belongs to. Immutable once created except
/// for the `read` flag.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ChatMessage {
    pub id: MessageId,
    pub contract_id: ContractId,
    pub sender_role: String, // 'admin', 'user', 'system'
    pub content: String,     // may be empty only with an attachment
    pub attachment_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub read: bool,
    pub metadata: Option<Json<MessageMetadata>>,
}

impl ChatMessage {
    pub fn role(&self) -> Option<SenderRole> {
        self.sender_role.parse().ok()
    }
}

/// Sender role enum
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Admin,
    User,
    System,
}

impl SenderRole {
    /// The role on the other side of the conversation. System
    /// messages have no counterpart.
    pub fn counterpart(&self) -> Option<SenderRole> {
        match self {
            SenderRole::Admin => Some(SenderRole::User),
            SenderRole::User => Some(SenderRole::Admin),
            SenderRole::System => None,
        }
    }
}

impl std::fmt::Display for SenderRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SenderRole::Admin => write!(f, "admin"),
            SenderRole::User => write!(f, "user"),
            SenderRole::System => write!(f, "system"),
        }
    }
}

impl std::str::FromStr for SenderRole {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "admin" => Ok(SenderRole::Admin),
            "user" => Ok(SenderRole::User),
            "system" => Ok(SenderRole::System),
            _ => Err(anyhow::anyhow!("Invalid sender role: {}", s)),
        }
    }
}

/// Structured payload on system messages. Tagged union so renderers
/// can handle known cards exhaustively and ignore unknown ones.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessageMetadata {
    /// Work-order offer card shown inline in the conversation.
    OrderOffer {
        order_title: String,
        reward: String,
        accepted: bool,
    },
    /// Unrecognized payload; carried but not interpreted.
    #[serde(other)]
    Unknown,
}

// =============================================================================
// Message Queries
// =============================================================================

impl ChatMessage {
    /// Append a message to a conversation's log. The ID is assigned
    /// here (time-ordered v7); `created_at` and `read` come from the
    /// database defaults.
    pub async fn append(
        contract_id: ContractId,
        sender_role: SenderRole,
        content: String,
        attachment_url: Option<String>,
        metadata: Option<MessageMetadata>,
        pool: &PgPool,
    ) -> Result<Self> {
        let message = sqlx::query_as::<_, ChatMessage>(
            r#"
            INSERT INTO chat_messages (id, contract_id, sender_role, content, attachment_url, metadata)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(MessageId::new())
        .bind(contract_id)
        .bind(sender_role.to_string())
        .bind(content)
        .bind(attachment_url)
        .bind(metadata.map(Json))
        .fetch_one(pool)
        .await?;
        Ok(message)
    }

    /// Load the newest `limit` messages of a conversation in ascending
    /// `created_at` order (ties broken by insertion order via the
    /// time-ordered ID). Older history is not paginated.
    pub async fn load_recent(contract_id: ContractId, limit: i64, pool: &PgPool) -> Result<Vec<Self>> {
        let messages = sqlx::query_as::<_, ChatMessage>(
            r#"
            SELECT * FROM (
                SELECT * FROM chat_messages
                WHERE contract_id = $1
                ORDER BY created_at DESC, id DESC
                LIMIT $2
            ) newest
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(contract_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(messages)
    }

    /// Mark all unread messages authored by `sender_role` as read.
    /// Idempotent; never un-reads. Callers pass the other party's
    /// role — a viewer only ever marks the counterpart's messages.
    ///
    /// Returns the number of rows updated.
    pub async fn mark_read(
        contract_id: ContractId,
        sender_role: SenderRole,
        pool: &PgPool,
    ) -> Result<u64> {
        let result = sqlx::query(
            r#"
            UPDATE chat_messages
            SET "read" = TRUE
            WHERE contract_id = $1 AND sender_role = $2 AND NOT "read"
            "#,
        )
        .bind(contract_id)
        .bind(sender_role.to_string())
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Count unread messages authored by `sender_role` in one
    /// conversation. Read-only projection for badge counts.
    pub async fn count_unread(
        contract_id: ContractId,
        sender_role: SenderRole,
        pool: &PgPool,
    ) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM chat_messages
            WHERE contract_id = $1 AND sender_role = $2 AND NOT "read"
            "#,
        )
        .bind(contract_id)
        .bind(sender_role.to_string())
        .fetch_one(pool)
        .await?;
        Ok(count)
    }

    /// Recent admin-authored message bodies from *other* conversations,
    /// newest first. Style corpus for reply suggestions.
    pub async fn recent_admin_corpus(
        exclude_contract_id: ContractId,
        limit: i64,
        pool: &PgPool,
    ) -> Result<Vec<String>> {
        let bodies = sqlx::query_scalar::<_, String>(
            r#"
            SELECT content FROM chat_messages
            WHERE sender_role = 'admin' AND contract_id <> $1 AND content <> ''
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(exclude_contract_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        Ok(bodies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_role_roundtrips_through_text() {
        for role in [SenderRole::Admin, SenderRole::User, SenderRole::System] {
            let parsed: SenderRole = role.to_string().parse().unwrap();
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn sender_role_rejects_unknown_text() {
        assert!("assistant".parse::<SenderRole>().is_err());
    }

    #[test]
    fn counterpart_pairs_admin_and_user() {
        assert_eq!(SenderRole::Admin.counterpart(), Some(SenderRole::User));
        assert_eq!(SenderRole::User.counterpart(), Some(SenderRole::Admin));
        assert_eq!(SenderRole::System.counterpart(), None);
    }

    #[test]
    fn metadata_parses_order_offer_card() {
        let raw = r#"{"type": "order_offer", "order_title": "Inventur Filiale Nord", "reward": "120,00 €", "accepted": false}"#;
        let metadata: MessageMetadata = serde_json::from_str(raw).unwrap();

        assert_eq!(
            metadata,
            MessageMetadata::OrderOffer {
                order_title: "Inventur Filiale Nord".into(),
                reward: "120,00 €".into(),
                accepted: false,
            }
        );
    }

    #[test]
    fn metadata_tolerates_unknown_cards() {
        let raw = r#"{"type": "confetti", "intensity": 11}"#;
        let metadata: MessageMetadata = serde_json::from_str(raw).unwrap();
        assert_eq!(metadata, MessageMetadata::Unknown);
    }
}

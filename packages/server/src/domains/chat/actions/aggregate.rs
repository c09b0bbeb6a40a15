//! Conversation list aggregation for the admin console.
//!
//! Scans the full message log, groups by contract, keeps the newest
//! message per conversation, counts unread employee messages, and
//! joins the employee directory for display names. Conversations
//! whose employee record cannot be resolved are dropped by the inner
//! join — inconsistent data, not an error. The caller re-runs this
//! whenever the global firehose reports any new message.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::common::ContractId;

/// Per-conversation summary for the admin list view. Always a
/// projection, never stored.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ConversationSummary {
    pub contract_id: ContractId,
    pub employee_name: String,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
    pub unread_count: i64,
}

/// Aggregate all conversations, newest activity first.
///
/// One grouped scan: correctness over efficiency, per the small data
/// volumes this serves. `unread_count` counts employee-authored
/// messages the admin side has not read yet.
pub async fn aggregate_conversations(pool: &PgPool) -> Result<Vec<ConversationSummary>> {
    let summaries = sqlx::query_as::<_, ConversationSummary>(
        r#"
        SELECT
            m.contract_id,
            e.first_name || ' ' || e.last_name AS employee_name,
            (array_agg(m.content ORDER BY m.created_at DESC, m.id DESC))[1] AS last_message,
            MAX(m.created_at) AS last_message_at,
            COUNT(*) FILTER (WHERE m.sender_role = 'user' AND NOT m."read") AS unread_count
        FROM chat_messages m
        JOIN employees e ON e.contract_id = m.contract_id
        GROUP BY m.contract_id, e.first_name, e.last_name
        ORDER BY last_message_at DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(summaries)
}

//! Suggest reply action - proposes one admin reply via the completion API
//!
//! Builds a role-labeled transcript of the active conversation plus a
//! style corpus of recent admin replies from other conversations, and
//! asks for one short, professional, German reply. The suggestion is
//! advisory only: nothing is written to the message log until the
//! admin accepts and sends it through the ordinary append path.

use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIError};
use sqlx::PgPool;
use thiserror::Error;
use tracing::{info, warn};

use crate::common::ContractId;
use crate::domains::chat::models::{ChatMessage, SenderRole};

/// How many conversation messages go into the transcript.
pub const TRANSCRIPT_LIMIT: i64 = 20;

/// How many cross-conversation admin replies form the style corpus.
pub const STYLE_CORPUS_LIMIT: i64 = 50;

const SUGGEST_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Error)]
pub enum SuggestError {
    /// The conversation's last message is not from the employee, so
    /// there is nothing to reply to.
    #[error("conversation has no open employee message")]
    NotEligible,

    #[error("rate limited by the completion service")]
    RateLimited,

    #[error("completion service quota exhausted")]
    QuotaExhausted,

    #[error("completion service unavailable: {0}")]
    Gateway(String),

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

/// Generate one suggested admin reply for a conversation.
pub async fn suggest_reply(
    contract_id: ContractId,
    pool: &PgPool,
    openai: &OpenAIClient,
) -> Result<String, SuggestError> {
    let transcript_messages = ChatMessage::load_recent(contract_id, TRANSCRIPT_LIMIT, pool).await?;

    // Only suggest while the employee has the last word
    let eligible = transcript_messages
        .last()
        .and_then(|m| m.role())
        .map(|role| role == SenderRole::User)
        .unwrap_or(false);
    if !eligible {
        return Err(SuggestError::NotEligible);
    }

    let corpus = ChatMessage::recent_admin_corpus(contract_id, STYLE_CORPUS_LIMIT, pool).await?;

    let prompt = build_prompt(&transcript_messages, &corpus);

    info!(contract_id = %contract_id, transcript_len = transcript_messages.len(), corpus_len = corpus.len(), "Requesting reply suggestion");

    let response = openai
        .chat_completion(ChatRequest {
            model: SUGGEST_MODEL.to_string(),
            messages: vec![Message::user(prompt)],
            temperature: Some(0.7),
            max_tokens: Some(300),
        })
        .await
        .map_err(|e| {
            warn!(contract_id = %contract_id, error = %e, "Reply suggestion failed");
            match e {
                OpenAIError::RateLimited(_) => SuggestError::RateLimited,
                OpenAIError::QuotaExhausted(_) => SuggestError::QuotaExhausted,
                other => SuggestError::Gateway(other.to_string()),
            }
        })?;

    let suggestion = response.first_content().unwrap_or_default().trim().to_string();
    if suggestion.is_empty() {
        return Err(SuggestError::Gateway("empty completion".to_string()));
    }

    Ok(suggestion)
}

/// Render the conversation as a role-labeled transcript.
pub fn build_transcript(messages: &[ChatMessage]) -> String {
    messages
        .iter()
        .map(|m| {
            let label = match m.role() {
                Some(SenderRole::Admin) => "Admin",
                Some(SenderRole::User) => "Mitarbeiter",
                _ => "System",
            };
            if m.content.is_empty() && m.attachment_url.is_some() {
                format!("{}: [Anhang]", label)
            } else {
                format!("{}: {}", label, m.content)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the full instruction prompt.
pub fn build_prompt(transcript_messages: &[ChatMessage], corpus: &[String]) -> String {
    let transcript = build_transcript(transcript_messages);
    let style_corpus = corpus.join("\n---\n");

    format!(
        r#"Du bist ein Mitarbeiter im Support-Team eines Personaldienstleisters und beantwortest Chat-Nachrichten von Mitarbeitern.

## Bisherige Antworten des Teams (Stil-Referenz)

{style_corpus}

## Aktueller Gesprächsverlauf

{transcript}

## Anweisung

Schreibe genau eine kurze, professionelle Antwort auf Deutsch auf die letzte Nachricht des Mitarbeiters.
Übernimm den Ton der Stil-Referenz. Keine Erklärungen, keine Formatierung, keine Rollen-Präfixe.

Deine Antwort:"#
    )
}

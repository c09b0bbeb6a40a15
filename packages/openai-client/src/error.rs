//! Error types for the OpenAI client.

use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
///
/// Rate-limit (429) and quota (402) responses get their own variants so
/// callers can surface distinct user-facing messages for them.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// HTTP 429 from the API
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// HTTP 402 from the API (billing quota exhausted)
    #[error("Quota exhausted: {0}")]
    QuotaExhausted(String),

    /// Any other non-2xx response
    #[error("API error ({status}): {message}")]
    Gateway { status: u16, message: String },

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

//! Typing presence broadcast endpoint.
//!
//! Accepts keystroke events and fans them out on the conversation's
//! typing topic. Throttled server-side; an empty draft (cleared)
//! always broadcasts so remote indicators disappear immediately.
//! Nothing here touches durable storage.

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;

use crate::common::ContractId;
use crate::domains::chat::models::SenderRole;
use crate::domains::chat::typing::TypingEvent;
use crate::kernel::typing_topic;
use crate::server::app::AppState;
use crate::server::routes::ErrorBody;

#[derive(Debug, Deserialize)]
pub struct TypingBody {
    pub role: SenderRole,
    #[serde(default)]
    pub draft_text: String,
}

/// POST /api/chat/:contract_id/typing
pub async fn typing_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
    Json(body): Json<TypingBody>,
) -> Result<StatusCode, (StatusCode, Json<ErrorBody>)> {
    let contract_id = ContractId::parse(&contract_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("invalid contract id")),
        )
    })?;

    let event = TypingEvent::new(contract_id, body.role, body.draft_text, Utc::now());

    let should_send = state.typing_throttle.lock().await.should_send(&event);
    if should_send {
        state
            .hub
            .publish(&typing_topic(contract_id), event.to_stream_value())
            .await;
    }

    // Throttled events are a silent no-op; best-effort channel
    Ok(StatusCode::NO_CONTENT)
}

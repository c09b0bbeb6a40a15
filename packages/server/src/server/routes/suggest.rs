//! AI reply suggestion endpoint.
//!
//! POST /api/chat/suggest with `{contract_id}`; responds with
//! `{suggestion}` or `{error}`. Rate-limit and quota failures map to
//! 429 and 402 with distinct messages so the console can render them
//! apart from generic gateway errors.

use axum::{extract::Extension, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::common::ContractId;
use crate::domains::chat::actions::{suggest_reply, SuggestError};
use crate::domains::chat::suggestion::SuggestionErrorKind;
use crate::server::app::AppState;
use crate::server::routes::ErrorBody;

#[derive(Debug, Deserialize)]
pub struct SuggestBody {
    pub contract_id: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub suggestion: String,
}

pub async fn suggest_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<SuggestBody>,
) -> Result<Json<SuggestResponse>, (StatusCode, Json<ErrorBody>)> {
    let contract_id = ContractId::parse(&body.contract_id).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("invalid contract id")),
        )
    })?;

    let suggestion = suggest_reply(contract_id, &state.db_pool, &state.openai_client)
        .await
        .map_err(|e| match e {
            SuggestError::NotEligible => (
                StatusCode::CONFLICT,
                Json(ErrorBody::new("conversation has no open employee message")),
            ),
            SuggestError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorBody::new(SuggestionErrorKind::RateLimited.user_message())),
            ),
            SuggestError::QuotaExhausted => (
                StatusCode::PAYMENT_REQUIRED,
                Json(ErrorBody::new(SuggestionErrorKind::QuotaExhausted.user_message())),
            ),
            SuggestError::Gateway(reason) => {
                error!(error = %reason, "Suggestion gateway failure");
                (
                    StatusCode::BAD_GATEWAY,
                    Json(ErrorBody::new(SuggestionErrorKind::Gateway.user_message())),
                )
            }
            SuggestError::Store(e) => {
                error!(error = %e, "Suggestion store failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("message store unavailable")),
                )
            }
        })?;

    Ok(Json(SuggestResponse { suggestion }))
}

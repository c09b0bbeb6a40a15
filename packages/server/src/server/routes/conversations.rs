//! Admin conversation list endpoint.

use axum::{extract::Extension, http::StatusCode, Json};
use tracing::error;

use crate::domains::chat::actions::aggregate_conversations;
use crate::domains::chat::data::ConversationSummaryData;
use crate::server::app::AppState;
use crate::server::routes::ErrorBody;

/// GET /api/chat/conversations
///
/// Full-log aggregation; the admin console re-fetches this whenever
/// the global stream reports a new message anywhere.
pub async fn list_conversations_handler(
    Extension(state): Extension<AppState>,
) -> Result<Json<Vec<ConversationSummaryData>>, (StatusCode, Json<ErrorBody>)> {
    let summaries = aggregate_conversations(&state.db_pool).await.map_err(|e| {
        error!(error = %e, "Conversation aggregation failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("conversation list unavailable")),
        )
    })?;

    Ok(Json(
        summaries.into_iter().map(ConversationSummaryData::from).collect(),
    ))
}

//! Message store endpoints: append, load, mark-read, unread count.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::common::ContractId;
use crate::domains::chat::actions::{append_message, AppendError};
use crate::domains::chat::data::MessageData;
use crate::domains::chat::models::message::DEFAULT_LOAD_LIMIT;
use crate::domains::chat::models::{ChatMessage, MessageMetadata, SenderRole};
use crate::server::app::AppState;
use crate::server::routes::ErrorBody;

fn parse_contract_id(raw: &str) -> Result<ContractId, (StatusCode, Json<ErrorBody>)> {
    ContractId::parse(raw).map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody::new("invalid contract id")),
        )
    })
}

fn store_error(e: impl std::fmt::Display) -> (StatusCode, Json<ErrorBody>) {
    error!(error = %e, "Message store operation failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new("message store unavailable")),
    )
}

#[derive(Debug, Deserialize)]
pub struct AppendBody {
    pub sender_role: SenderRole,
    #[serde(default)]
    pub content: String,
    pub attachment_url: Option<String>,
    pub metadata: Option<MessageMetadata>,
}

/// POST /api/chat/:contract_id/messages
pub async fn append_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
    Json(body): Json<AppendBody>,
) -> Result<(StatusCode, Json<MessageData>), (StatusCode, Json<ErrorBody>)> {
    let contract_id = parse_contract_id(&contract_id)?;

    let message = append_message(
        contract_id,
        body.sender_role,
        body.content,
        body.attachment_url,
        body.metadata,
        &state.db_pool,
        &state.hub,
        &state.notifier,
    )
    .await
    .map_err(|e| match e {
        AppendError::EmptyMessage => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorBody::new("message requires content or an attachment")),
        ),
        AppendError::Store(e) => store_error(e),
    })?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

#[derive(Debug, Deserialize)]
pub struct LoadQuery {
    pub limit: Option<i64>,
}

/// GET /api/chat/:contract_id/messages?limit=
pub async fn load_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
    Query(query): Query<LoadQuery>,
) -> Result<Json<Vec<MessageData>>, (StatusCode, Json<ErrorBody>)> {
    let contract_id = parse_contract_id(&contract_id)?;
    let limit = query.limit.unwrap_or(DEFAULT_LOAD_LIMIT).clamp(1, DEFAULT_LOAD_LIMIT);

    let messages = ChatMessage::load_recent(contract_id, limit, &state.db_pool)
        .await
        .map_err(store_error)?;

    Ok(Json(messages.into_iter().map(MessageData::from).collect()))
}

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
    /// Role whose messages get marked read - the viewer passes the
    /// other party's role.
    pub sender_role: SenderRole,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub updated: u64,
}

/// POST /api/chat/:contract_id/read
pub async fn mark_read_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
    Json(body): Json<MarkReadBody>,
) -> Result<Json<MarkReadResponse>, (StatusCode, Json<ErrorBody>)> {
    let contract_id = parse_contract_id(&contract_id)?;

    let updated = ChatMessage::mark_read(contract_id, body.sender_role, &state.db_pool)
        .await
        .map_err(store_error)?;

    Ok(Json(MarkReadResponse { updated }))
}

#[derive(Debug, Deserialize)]
pub struct UnreadQuery {
    /// Role whose unread messages are counted.
    pub role: SenderRole,
}

#[derive(Debug, Serialize)]
pub struct UnreadResponse {
    pub unread_count: i64,
}

/// GET /api/chat/:contract_id/unread?role=
pub async fn unread_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
    Query(query): Query<UnreadQuery>,
) -> Result<Json<UnreadResponse>, (StatusCode, Json<ErrorBody>)> {
    let contract_id = parse_contract_id(&contract_id)?;

    let unread_count = ChatMessage::count_unread(contract_id, query.role, &state.db_pool)
        .await
        .map_err(store_error)?;

    Ok(Json(UnreadResponse { unread_count }))
}

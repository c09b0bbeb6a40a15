//! SSE streaming endpoints.
//!
//! One stream per conversation for message events, one per
//! conversation for typing presence, and a global stream carrying
//! every message event for the admin conversation list. Subscribers
//! only receive events published after they connect; history comes
//! from the bulk load endpoint. The broadcast receiver is dropped
//! when the client disconnects, so channels never leak across
//! conversation switches.

use std::convert::Infallible;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
};
use futures::stream::{self, Stream, StreamExt};
use tokio::sync::broadcast;
use tokio_stream::wrappers::errors::BroadcastStreamRecvError;
use tokio_stream::wrappers::BroadcastStream;

use crate::common::ContractId;
use crate::kernel::{chat_topic, typing_topic};
use crate::server::app::AppState;

fn parse_contract_id(raw: &str) -> Result<ContractId, StatusCode> {
    ContractId::parse(raw).map_err(|_| StatusCode::BAD_REQUEST)
}

/// Turn a broadcast receiver into an SSE response with a connected
/// marker, lag reporting, and keep-alives.
fn sse_response(
    rx: broadcast::Receiver<serde_json::Value>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let connected =
        stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

    let events = BroadcastStream::new(rx).filter_map(|result| async move {
        match result {
            Ok(value) => {
                let event_name = value
                    .get("type")
                    .and_then(|t| t.as_str())
                    .unwrap_or("message")
                    .to_string();
                Event::default().event(event_name).json_data(&value).ok().map(Ok)
            }
            Err(BroadcastStreamRecvError::Lagged(n)) => Event::default()
                .event("lagged")
                .json_data(&serde_json::json!({ "missed": n }))
                .ok()
                .map(Ok),
        }
    });

    Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}

/// GET /api/streams/chat/:contract_id — one conversation's messages.
pub async fn chat_stream_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let contract_id = parse_contract_id(&contract_id)?;
    let rx = state.hub.subscribe(&chat_topic(contract_id)).await;
    Ok(sse_response(rx))
}

/// GET /api/streams/typing/:contract_id — one conversation's typing
/// presence.
pub async fn typing_stream_handler(
    Extension(state): Extension<AppState>,
    Path(contract_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, StatusCode> {
    let contract_id = parse_contract_id(&contract_id)?;
    let rx = state.hub.subscribe(&typing_topic(contract_id)).await;
    Ok(sse_response(rx))
}

/// GET /api/streams/chat — every message event system-wide (admin
/// conversation list).
pub async fn global_stream_handler(
    Extension(state): Extension<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse_response(state.hub.subscribe_global())
}

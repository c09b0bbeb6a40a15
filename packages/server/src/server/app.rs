//! Application setup and server configuration.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, post},
    Router,
};
use openai_client::OpenAIClient;
use sqlx::PgPool;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::domains::chat::typing::TypingThrottle;
use crate::kernel::{ChatHub, StaffNotifier};
use crate::server::routes::{
    append_handler, chat_stream_handler, global_stream_handler, health_handler,
    list_conversations_handler, load_handler, mark_read_handler, suggest_handler, typing_handler,
    typing_stream_handler, unread_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub hub: ChatHub,
    pub notifier: StaffNotifier,
    pub openai_client: Arc<OpenAIClient>,
    /// Server-enforced keystroke throttle for typing broadcasts.
    pub typing_throttle: Arc<Mutex<TypingThrottle>>,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool, openai_api_key: String, staff_notify_url: Option<String>) -> Router {
    let app_state = AppState {
        db_pool: pool,
        hub: ChatHub::new(),
        notifier: StaffNotifier::new(staff_notify_url),
        openai_client: Arc::new(OpenAIClient::new(openai_api_key)),
        typing_throttle: Arc::new(Mutex::new(TypingThrottle::new())),
    };

    // CORS: the employee widget and admin console run on other origins
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        // Conversation list (admin console)
        .route("/api/chat/conversations", get(list_conversations_handler))
        // AI reply suggestion
        .route("/api/chat/suggest", post(suggest_handler))
        // Message store operations
        .route(
            "/api/chat/:contract_id/messages",
            post(append_handler).get(load_handler),
        )
        .route("/api/chat/:contract_id/read", post(mark_read_handler))
        .route("/api/chat/:contract_id/unread", get(unread_handler))
        // Typing presence broadcast
        .route("/api/chat/:contract_id/typing", post(typing_handler))
        // SSE streams
        .route("/api/streams/chat", get(global_stream_handler))
        .route("/api/streams/chat/:contract_id", get(chat_stream_handler))
        .route("/api/streams/typing/:contract_id", get(typing_stream_handler))
        // Health check
        .route("/health", get(health_handler))
        // Middleware layers (applied in reverse order - last added runs first)
        .layer(Extension(app_state))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

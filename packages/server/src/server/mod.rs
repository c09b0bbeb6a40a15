// HTTP server setup (Axum REST + SSE)
pub mod app;
pub mod routes;

pub use app::*;

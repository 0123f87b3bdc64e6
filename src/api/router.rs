use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{chat, health};

/// Build the HTTP router. CORS is permissive because the widget is embedded
/// on arbitrary customer sites.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/chat/generate", post(chat::generate))
        .route("/api/knowledge-base/search", post(chat::search))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

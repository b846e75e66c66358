use super::handlers;
use super::state::AppState;
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Turns
        .route("/chat/send", post(handlers::send_message))
        .route("/chat/state", get(handlers::get_state))
        .route("/chat/transcript", get(handlers::get_transcript))
        // Selection
        .route(
            "/chat/settings",
            get(handlers::get_settings).put(handlers::update_settings),
        )
        .route("/chat/prompts", get(handlers::list_prompts))
        // Add tracing middleware for request logging
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

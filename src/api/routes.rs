//! API Routes
//!
//! Configures the Axum router: shell endpoints under `/_shell`, everything
//! else through the intercept fallback.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    chat_handler, health_handler, intercept_handler, jam_handler, jam_toggle_handler,
    status_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_shell/health", get(health_handler))
        .route("/_shell/status", get(status_handler))
        .route("/_shell/chat", post(chat_handler))
        .route("/_shell/jam", get(jam_handler))
        .route("/_shell/jam/toggle", post(jam_toggle_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

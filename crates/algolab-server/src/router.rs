//! Router assembly for the algolab HTTP API.
//!
//! [`build_router`] wires all handler functions to their routes with
//! CORS and tracing middleware layers.

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Builds the complete axum router with all API routes.
///
/// CORS is permissive so browser front-ends on any origin can drive sessions.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/algorithms", get(handlers::health::list_algorithms))
        // Session lifecycle
        .route(
            "/sessions",
            get(handlers::sessions::list_sessions).post(handlers::sessions::create_session),
        )
        .route(
            "/sessions/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::delete_session),
        )
        // Stepping
        .route("/sessions/{id}/step", post(handlers::sessions::step_session))
        .route("/sessions/{id}/pause", post(handlers::sessions::pause_session))
        .route("/sessions/{id}/resume", post(handlers::sessions::resume_session))
        .route("/sessions/{id}/play", get(handlers::stream::play_session))
        .route("/ws/sessions/{id}", get(handlers::socket::session_socket))
        // Inspection
        .route("/sessions/{id}/events", get(handlers::sessions::session_events))
        .route("/sessions/{id}/adj", get(handlers::sessions::session_adjacency))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

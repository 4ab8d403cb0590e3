//! Liveness and discovery endpoints.

use axum::extract::State;
use axum::Json;

use crate::schema::sessions::AlgorithmsResponse;
use crate::state::AppState;

/// `GET /health`
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}

/// `GET /algorithms`
pub async fn list_algorithms(State(state): State<AppState>) -> Json<AlgorithmsResponse> {
    Json(AlgorithmsResponse {
        algorithms: state.runner.algorithms().map(str::to_string).collect(),
    })
}

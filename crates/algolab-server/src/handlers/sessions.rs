//! Session lifecycle and single-step handlers.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::Json;

use algolab_core::{GraphInput, NodeId};
use algolab_engine::{Advance, Algorithm};

use super::find_session;
use crate::error::ApiError;
use crate::schema::sessions::{
    adjacency_view, AdjacencyView, CreateSessionParams, CreateSessionResponse, HistoryResponse,
    ListSessionsResponse, PauseResponse, SessionSummary,
};
use crate::session::{Session, SessionId};
use crate::state::AppState;

/// `POST /sessions?algo=bfs&start=A`
pub async fn create_session(
    State(state): State<AppState>,
    Query(params): Query<CreateSessionParams>,
    Json(input): Json<GraphInput>,
) -> Result<Json<CreateSessionResponse>, ApiError> {
    let graph = Arc::new(input.build()?);
    let algo = params
        .algo
        .unwrap_or_else(|| Algorithm::Bfs.name().to_string());
    let start = params
        .start
        .map(NodeId::from)
        .or_else(|| input.default_start())
        .ok_or_else(|| {
            ApiError::BadRequest("graph has no nodes; pass an explicit start".to_string())
        })?;

    let stepper = state.runner.create(&algo, Arc::clone(&graph), start)?;
    let id = SessionId::new();
    let session = Session::new(id, graph, stepper, state.config.trace_events);
    tracing::info!(
        session = %id,
        algo = %session.algorithm(),
        start = %session.start(),
        nodes = session.graph.node_count(),
        "session created"
    );
    state.sessions.put(session);

    Ok(Json(CreateSessionResponse { session_id: id.0 }))
}

/// `GET /sessions`
pub async fn list_sessions(
    State(state): State<AppState>,
) -> Result<Json<ListSessionsResponse>, ApiError> {
    let mut entries = Vec::with_capacity(state.sessions.len());
    for handle in state.sessions.list() {
        let session = handle.lock().await;
        entries.push((session.created_at, SessionSummary::from(&*session)));
    }
    entries.sort_by_key(|(created_at, _)| *created_at);

    Ok(Json(ListSessionsResponse {
        sessions: entries.into_iter().map(|(_, summary)| summary).collect(),
    }))
}

/// `GET /sessions/{id}`
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSummary>, ApiError> {
    let (_, handle) = find_session(&state, &id)?;
    let session = handle.lock().await;
    Ok(Json(SessionSummary::from(&*session)))
}

/// `DELETE /sessions/{id}`
pub async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let (id, _) = find_session(&state, &id)?;
    if !state.sessions.remove(&id) {
        return Err(ApiError::unknown_session(id));
    }
    tracing::info!(session = %id, "session removed");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// `POST /sessions/{id}/step`
pub async fn step_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Advance>, ApiError> {
    let (_, handle) = find_session(&state, &id)?;
    let advance = handle.lock().await.advance();
    Ok(Json(advance))
}

/// `GET /sessions/{id}/events`
pub async fn session_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let (id, handle) = find_session(&state, &id)?;
    let session = handle.lock().await;
    Ok(Json(HistoryResponse {
        session_id: id.0,
        tracing: session.is_tracing(),
        events: session.history().to_vec(),
    }))
}

/// `GET /sessions/{id}/adj`
pub async fn session_adjacency(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AdjacencyView>, ApiError> {
    let (_, handle) = find_session(&state, &id)?;
    let session = handle.lock().await;
    Ok(Json(adjacency_view(&session.graph)))
}

/// `POST /sessions/{id}/pause`
pub async fn pause_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PauseResponse>, ApiError> {
    set_paused(&state, &id, true).await
}

/// `POST /sessions/{id}/resume`
pub async fn resume_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PauseResponse>, ApiError> {
    set_paused(&state, &id, false).await
}

async fn set_paused(
    state: &AppState,
    raw_id: &str,
    paused: bool,
) -> Result<Json<PauseResponse>, ApiError> {
    let (id, handle) = find_session(state, raw_id)?;
    let mut session = handle.lock().await;
    session.paused = paused;
    session.touch();
    tracing::debug!(session = %id, paused, "pause flag set");
    Ok(Json(PauseResponse {
        session_id: id.0,
        paused,
    }))
}

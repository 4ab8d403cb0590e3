//! Schema types for the session API.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use algolab_core::{Graph, NodeId};
use algolab_engine::{Event, Lifecycle};

use crate::session::Session;

/// Query string of `POST /sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSessionParams {
    /// Algorithm name. Defaults to `bfs`.
    pub algo: Option<String>,
    /// Start node. Defaults to the first declared node.
    pub start: Option<String>,
}

/// Response after a session is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSessionResponse {
    pub session_id: Uuid,
}

/// Snapshot of a session's progress.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: Uuid,
    pub algo: String,
    pub start: NodeId,
    pub paused: bool,
    pub lifecycle: Lifecycle,
    pub exhausted: bool,
    /// Advances that produced an event.
    pub steps: u64,
    pub visit_order: Vec<NodeId>,
    pub directed: bool,
    pub weighted: bool,
    pub node_count: usize,
}

impl From<&Session> for SessionSummary {
    fn from(session: &Session) -> Self {
        let stepper = session.stepper();
        SessionSummary {
            session_id: session.id.0,
            algo: session.algorithm().to_string(),
            start: session.start().clone(),
            paused: session.paused,
            lifecycle: stepper.lifecycle(),
            exhausted: stepper.is_exhausted(),
            steps: session.steps(),
            visit_order: stepper.visit_order().to_vec(),
            directed: session.graph.is_directed(),
            weighted: session.graph.is_weighted(),
            node_count: session.graph.node_count(),
        }
    }
}

/// Response for `GET /sessions`.
#[derive(Debug, Clone, Serialize)]
pub struct ListSessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

/// Response for `GET /algorithms`.
#[derive(Debug, Clone, Serialize)]
pub struct AlgorithmsResponse {
    pub algorithms: Vec<String>,
}

/// Response for `GET /sessions/{id}/events`.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResponse {
    pub session_id: Uuid,
    /// `false` when the server runs with event tracing disabled; `events`
    /// is then always empty.
    pub tracing: bool,
    pub events: Vec<Event>,
}

/// Response for pause/resume.
#[derive(Debug, Clone, Serialize)]
pub struct PauseResponse {
    pub session_id: Uuid,
    pub paused: bool,
}

/// Query string of `GET /sessions/{id}/play`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PlayParams {
    /// Delay between events. Defaults to the configured play interval.
    pub interval_ms: Option<u64>,
}

/// Adjacency as served by `GET /sessions/{id}/adj`: each node maps to its
/// `[neighbor, weight]` pairs in insertion order.
pub type AdjacencyView = IndexMap<NodeId, Vec<(NodeId, Option<f64>)>>;

pub fn adjacency_view(graph: &Graph) -> AdjacencyView {
    graph
        .adjacency()
        .iter()
        .map(|(node, neighbors)| {
            let pairs = neighbors
                .iter()
                .map(|n| (n.node.clone(), n.weight))
                .collect();
            (node.clone(), pairs)
        })
        .collect()
}

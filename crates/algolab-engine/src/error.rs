//! Errors raised when creating a traversal.
//!
//! Advancing a traversal never fails: exhaustion is reported as a terminal
//! outcome, not an error.

use algolab_core::NodeId;
use serde::{Deserialize, Serialize};

/// Engine errors. Each is reported to the immediate caller and never retried.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum EngineError {
    #[error("unknown algorithm '{name}'")]
    UnknownAlgorithm { name: String },

    #[error("start node '{node}' is not in the graph")]
    StartNodeNotFound { node: NodeId },

    #[error("negative edge weight {weight} on {u} -> {v}")]
    NegativeWeight { u: NodeId, v: NodeId, weight: f64 },
}

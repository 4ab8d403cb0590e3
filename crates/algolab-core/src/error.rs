//! Core error types for algolab-core.
//!
//! Graph construction itself never fails; the only failure mode in this crate
//! is a graph description rejected at the input boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single problem found while validating a graph description.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputIssue {
    /// Where the problem was found, e.g. `nodes[2]` or `edges[0].w`.
    pub location: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for InputIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.message)
    }
}

/// Core errors produced by the algolab-core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The graph description failed validation. All issues are reported at once.
    #[error("malformed graph input: {} issue(s)", issues.len())]
    MalformedGraphInput { issues: Vec<InputIssue> },
}

//! Graph model for step-driven traversal visualization.
//!
//! - [`Graph`]: insertion-ordered adjacency list, directed or undirected,
//!   weighted or unweighted.
//! - [`NodeId`]: the normalized vertex identifier.
//! - [`GraphInput`]: the external description format and its validation.

pub mod error;
pub mod graph;
pub mod id;
pub mod input;

pub use error::{CoreError, InputIssue};
pub use graph::{Graph, Neighbor};
pub use id::NodeId;
pub use input::{EdgeInput, GraphInput, NodeRef};

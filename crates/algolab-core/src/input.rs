//! Graph description accepted from external callers.
//!
//! [`GraphInput`] is the serde shape clients post (JSON). It is validated and
//! normalized here, before any [`Graph`] exists, so the rest of the system
//! only ever sees well-formed graphs with string [`NodeId`]s.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, InputIssue};
use crate::graph::Graph;
use crate::id::NodeId;

/// A node reference as written by the client: a string or an integer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeRef {
    Int(i64),
    Str(String),
}

impl NodeRef {
    /// Normalizes to the string form used inside the engine.
    pub fn normalize(&self) -> NodeId {
        match self {
            NodeRef::Int(n) => NodeId::from(*n),
            NodeRef::Str(s) => NodeId::from(s.as_str()),
        }
    }

    fn is_int(&self) -> bool {
        matches!(self, NodeRef::Int(_))
    }
}

impl From<&str> for NodeRef {
    fn from(s: &str) -> Self {
        NodeRef::Str(s.to_string())
    }
}

impl From<i64> for NodeRef {
    fn from(n: i64) -> Self {
        NodeRef::Int(n)
    }
}

/// One edge of the description. `w` is ignored for unweighted graphs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInput {
    pub u: NodeRef,
    pub v: NodeRef,
    #[serde(default)]
    pub w: Option<f64>,
}

/// Full graph description.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphInput {
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub weighted: bool,
    #[serde(default)]
    pub nodes: Vec<NodeRef>,
    #[serde(default)]
    pub edges: Vec<EdgeInput>,
}

impl GraphInput {
    /// Checks the description and reports every problem found.
    pub fn validate(&self) -> Result<(), CoreError> {
        let mut issues = Vec::new();
        // normalized id -> whether it was first seen as an integer
        let mut seen: HashMap<NodeId, bool> = HashMap::new();

        let refs = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, r)| (format!("nodes[{i}]"), r))
            .chain(self.edges.iter().enumerate().flat_map(|(i, e)| {
                [(format!("edges[{i}].u"), &e.u), (format!("edges[{i}].v"), &e.v)]
            }));

        for (location, node_ref) in refs {
            let id = node_ref.normalize();
            if id.as_str().trim().is_empty() {
                issues.push(InputIssue {
                    location,
                    message: "node identifier must not be empty".into(),
                });
                continue;
            }
            match seen.get(&id) {
                Some(&was_int) if was_int != node_ref.is_int() => {
                    issues.push(InputIssue {
                        location,
                        message: format!(
                            "node '{id}' is given both as an integer and as a string"
                        ),
                    });
                }
                Some(_) => {}
                None => {
                    seen.insert(id, node_ref.is_int());
                }
            }
        }

        for (i, edge) in self.edges.iter().enumerate() {
            if let Some(w) = edge.w {
                if !w.is_finite() {
                    issues.push(InputIssue {
                        location: format!("edges[{i}].w"),
                        message: format!("edge weight must be finite, got {w}"),
                    });
                }
            }
        }

        if issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::MalformedGraphInput { issues })
        }
    }

    /// Validates, then builds the graph: declared nodes first, then edges,
    /// both in input order.
    pub fn build(&self) -> Result<Graph, CoreError> {
        self.validate()?;

        let mut graph = Graph::new(self.directed, self.weighted);
        for node in &self.nodes {
            graph.add_node(node.normalize());
        }
        for edge in &self.edges {
            graph.add_edge(edge.u.normalize(), edge.v.normalize(), edge.w);
        }
        Ok(graph)
    }

    /// The node a traversal starts from when the caller names none: the
    /// first declared node, else the source of the first edge.
    pub fn default_start(&self) -> Option<NodeId> {
        self.nodes
            .first()
            .or_else(|| self.edges.first().map(|e| &e.u))
            .map(NodeRef::normalize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(u: impl Into<NodeRef>, v: impl Into<NodeRef>, w: Option<f64>) -> EdgeInput {
        EdgeInput {
            u: u.into(),
            v: v.into(),
            w,
        }
    }

    #[test]
    fn deserializes_mixed_node_refs() {
        let input: GraphInput = serde_json::from_str(
            r#"{"directed": true, "nodes": [1, "b"], "edges": [{"u": 1, "v": "b", "w": 2.0}]}"#,
        )
        .unwrap();
        assert!(input.directed);
        assert!(!input.weighted);
        assert_eq!(input.nodes, vec![NodeRef::Int(1), NodeRef::Str("b".into())]);
        assert_eq!(input.edges[0].w, Some(2.0));
    }

    #[test]
    fn missing_fields_default() {
        let input: GraphInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input, GraphInput::default());
        assert_eq!(input.default_start(), None);
    }

    #[test]
    fn build_normalizes_ids_and_adds_endpoints() {
        let input = GraphInput {
            directed: false,
            weighted: false,
            nodes: vec![1i64.into(), 2i64.into()],
            edges: vec![edge(2i64, 3i64, Some(4.0))],
        };
        let graph = input.build().unwrap();
        let order: Vec<&str> = graph.nodes().map(NodeId::as_str).collect();
        assert_eq!(order, vec!["1", "2", "3"]);
        assert_eq!(graph.neighbors("3")[0].node.as_str(), "2");
        assert_eq!(graph.neighbors("3")[0].weight, None);
    }

    #[test]
    fn rejects_int_string_collision() {
        let input = GraphInput {
            nodes: vec![1i64.into(), "1".into()],
            ..Default::default()
        };
        match input.build() {
            Err(CoreError::MalformedGraphInput { issues }) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].location, "nodes[1]");
            }
            other => panic!("expected MalformedGraphInput, got {:?}", other),
        }
    }

    #[test]
    fn repeated_identical_nodes_are_fine() {
        let input = GraphInput {
            nodes: vec!["A".into(), "A".into()],
            edges: vec![edge("A", "A", None)],
            ..Default::default()
        };
        let graph = input.build().unwrap();
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn reports_all_issues_at_once() {
        let input = GraphInput {
            weighted: true,
            nodes: vec!["".into()],
            edges: vec![edge("A", "B", Some(f64::INFINITY)), edge("  ", "B", None)],
            ..Default::default()
        };
        match input.validate() {
            Err(CoreError::MalformedGraphInput { issues }) => {
                let locations: Vec<&str> = issues.iter().map(|i| i.location.as_str()).collect();
                assert_eq!(locations, vec!["nodes[0]", "edges[1].u", "edges[0].w"]);
            }
            other => panic!("expected MalformedGraphInput, got {:?}", other),
        }
    }

    #[test]
    fn default_start_falls_back_to_first_edge() {
        let input = GraphInput {
            edges: vec![edge(7i64, 8i64, None)],
            ..Default::default()
        };
        assert_eq!(input.default_start(), Some(NodeId::from("7")));
    }
}

//! Adjacency-list graph used by every traversal.
//!
//! [`Graph`] stores, for each node, the ordered sequence of outgoing
//! [`Neighbor`]s. Insertion order is significant: it is the order in which
//! traversals discover neighbors, so both the node map and each neighbor list
//! preserve it exactly.
//!
//! Construction rules:
//! - Undirected graphs store every edge twice (`u -> v` and `v -> u`) with the
//!   same weight.
//! - Unweighted graphs discard any supplied weight and store `None`.
//! - Duplicate edges and self-loops are kept as given.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// One entry of a node's neighbor sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Neighbor {
    pub node: NodeId,
    pub weight: Option<f64>,
}

/// Directed or undirected, weighted or unweighted adjacency-list graph.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Graph {
    directed: bool,
    weighted: bool,
    adjacency: IndexMap<NodeId, Vec<Neighbor>>,
}

impl Graph {
    /// Creates an empty graph.
    pub fn new(directed: bool, weighted: bool) -> Self {
        Graph {
            directed,
            weighted,
            adjacency: IndexMap::new(),
        }
    }

    // -----------------------------------------------------------------------
    // Construction
    // -----------------------------------------------------------------------

    /// Ensures `id` is present. Idempotent: an existing neighbor list is
    /// left untouched.
    pub fn add_node(&mut self, id: impl Into<NodeId>) {
        self.adjacency.entry(id.into()).or_default();
    }

    /// Appends the edge `u -> v` (and `v -> u` when undirected), adding
    /// missing endpoints first.
    pub fn add_edge(&mut self, u: impl Into<NodeId>, v: impl Into<NodeId>, weight: Option<f64>) {
        let u = u.into();
        let v = v.into();
        self.add_node(u.clone());
        self.add_node(v.clone());

        let weight = if self.weighted { weight } else { None };

        self.adjacency
            .entry(u.clone())
            .or_default()
            .push(Neighbor {
                node: v.clone(),
                weight,
            });
        if !self.directed {
            self.adjacency
                .entry(v)
                .or_default()
                .push(Neighbor { node: u, weight });
        }
    }

    // -----------------------------------------------------------------------
    // Read-only accessors
    // -----------------------------------------------------------------------

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.adjacency.contains_key(id)
    }

    /// Returns the neighbor sequence of `id`, or an empty slice for an
    /// unknown node.
    pub fn neighbors(&self, id: &str) -> &[Neighbor] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates node ids in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeId> {
        self.adjacency.keys()
    }

    pub fn first_node(&self) -> Option<&NodeId> {
        self.adjacency.keys().next()
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of stored arcs. An undirected edge, self-loops included,
    /// counts twice.
    pub fn arc_count(&self) -> usize {
        self.adjacency.values().map(Vec::len).sum()
    }

    /// Smallest stored weight, if any edge carries one.
    pub fn min_weight(&self) -> Option<f64> {
        self.adjacency
            .values()
            .flatten()
            .filter_map(|n| n.weight)
            .min_by(f64::total_cmp)
    }

    /// Iterates every stored arc as `(source, neighbor)`.
    pub fn arcs(&self) -> impl Iterator<Item = (&NodeId, &Neighbor)> {
        self.adjacency
            .iter()
            .flat_map(|(u, list)| list.iter().map(move |n| (u, n)))
    }

    /// Returns the full adjacency map.
    pub fn adjacency(&self) -> &IndexMap<NodeId, Vec<Neighbor>> {
        &self.adjacency
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ids(list: &[Neighbor]) -> Vec<&str> {
        list.iter().map(|n| n.node.as_str()).collect()
    }

    #[test]
    fn add_node_is_idempotent() {
        let mut g = Graph::new(true, false);
        g.add_edge("A", "B", None);
        g.add_node("A");
        assert_eq!(g.node_count(), 2);
        assert_eq!(ids(g.neighbors("A")), vec!["B"]);
    }

    #[test]
    fn add_edge_adds_missing_endpoints() {
        let mut g = Graph::new(true, false);
        g.add_edge("X", "Y", None);
        assert!(g.contains_node("X"));
        assert!(g.contains_node("Y"));
        assert!(g.neighbors("Y").is_empty());
    }

    #[test]
    fn undirected_edge_stored_both_ways() {
        let mut g = Graph::new(false, true);
        g.add_edge("A", "B", Some(2.5));
        assert_eq!(g.neighbors("A"), &[Neighbor { node: "B".into(), weight: Some(2.5) }]);
        assert_eq!(g.neighbors("B"), &[Neighbor { node: "A".into(), weight: Some(2.5) }]);
        assert_eq!(g.arc_count(), 2);
    }

    #[test]
    fn unweighted_graph_erases_weights() {
        let mut g = Graph::new(false, false);
        g.add_edge("A", "B", Some(9.0));
        assert_eq!(g.neighbors("A")[0].weight, None);
        assert_eq!(g.neighbors("B")[0].weight, None);
        assert_eq!(g.min_weight(), None);
    }

    #[test]
    fn duplicate_edges_and_self_loops_are_preserved_in_order() {
        let mut g = Graph::new(true, false);
        g.add_edge("A", "C", None);
        g.add_edge("A", "A", None);
        g.add_edge("A", "B", None);
        g.add_edge("A", "C", None);
        assert_eq!(ids(g.neighbors("A")), vec!["C", "A", "B", "C"]);
    }

    #[test]
    fn node_order_is_insertion_order() {
        let mut g = Graph::new(true, false);
        g.add_node("z");
        g.add_node("a");
        g.add_edge("m", "a", None);
        let order: Vec<&str> = g.nodes().map(NodeId::as_str).collect();
        assert_eq!(order, vec!["z", "a", "m"]);
        assert_eq!(g.first_node().map(NodeId::as_str), Some("z"));
    }

    #[test]
    fn unknown_node_has_no_neighbors() {
        let g = Graph::new(false, false);
        assert!(g.neighbors("ghost").is_empty());
    }

    #[test]
    fn min_weight_picks_smallest() {
        let mut g = Graph::new(true, true);
        g.add_edge("A", "B", Some(3.0));
        g.add_edge("B", "C", Some(-1.5));
        g.add_edge("C", "A", None);
        assert_eq!(g.min_weight(), Some(-1.5));
    }

    fn edge_list() -> impl Strategy<Value = Vec<(u8, u8, Option<f64>)>> {
        prop::collection::vec(
            (0u8..8, 0u8..8, prop::option::of(-10.0f64..10.0)),
            0..24,
        )
    }

    proptest! {
        #[test]
        fn undirected_edges_are_symmetric(edges in edge_list(), weighted in any::<bool>()) {
            let mut g = Graph::new(false, weighted);
            for (u, v, w) in &edges {
                g.add_edge(u.to_string(), v.to_string(), *w);
            }
            for (u, n) in g.arcs() {
                let back = g
                    .neighbors(n.node.as_str())
                    .iter()
                    .any(|m| &m.node == u && m.weight == n.weight);
                prop_assert!(back, "missing reverse arc {} -> {}", n.node, u);
            }
            prop_assert_eq!(g.arc_count(), edges.len() * 2);
        }

        #[test]
        fn unweighted_graphs_store_no_weights(edges in edge_list(), directed in any::<bool>()) {
            let mut g = Graph::new(directed, false);
            for (u, v, w) in &edges {
                g.add_edge(u.to_string(), v.to_string(), *w);
            }
            prop_assert!(g.arcs().all(|(_, n)| n.weight.is_none()));
        }
    }
}

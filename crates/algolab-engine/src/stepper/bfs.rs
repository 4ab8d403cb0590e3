//! Breadth-first traversal as a resumable state machine.
//!
//! Expanding one node produces several events (pop, mark, visit, then a
//! discover/push pair per new neighbor). [`Phase`] records which of those
//! sub-steps comes next, so each call to [`Traversal::step`] emits exactly
//! one event.
//!
//! A neighbor is enqueued only if it is neither visited nor already queued,
//! so every node enters the frontier at most once. Self-loops and duplicate
//! edges therefore never produce duplicate frontier entries.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use algolab_core::{Graph, NodeId};

use super::{Lifecycle, StepOutcome, Traversal};
use crate::event::{Event, Frontier};

const NAME: &str = "bfs";

#[derive(Debug, Clone)]
enum Phase {
    NotStarted,
    Seed,
    Dequeue,
    Mark(NodeId),
    Visit(NodeId),
    /// Scanning `node`'s neighbors from index `next`.
    Expand { node: NodeId, next: usize },
    /// `found` was discovered from `node`; enqueue it, then resume at `next`.
    Push { node: NodeId, next: usize, found: NodeId },
    Exhausted,
}

/// Breadth-first stepper.
#[derive(Debug)]
pub struct BfsStepper {
    graph: Arc<Graph>,
    start: NodeId,
    visited: HashSet<NodeId>,
    visit_order: Vec<NodeId>,
    frontier: VecDeque<NodeId>,
    phase: Phase,
}

impl BfsStepper {
    pub fn new(graph: Arc<Graph>, start: NodeId) -> Self {
        BfsStepper {
            graph,
            start,
            visited: HashSet::new(),
            visit_order: Vec::new(),
            frontier: VecDeque::new(),
            phase: Phase::NotStarted,
        }
    }

    /// Current frontier contents, front first.
    pub fn frontier(&self) -> impl Iterator<Item = &NodeId> {
        self.frontier.iter()
    }

    fn queue_snapshot(&self) -> Frontier {
        Frontier::Queue(self.frontier.iter().cloned().collect())
    }

    /// Index and id of the first neighbor of `node` at or after `from`
    /// that is neither visited nor queued.
    fn next_discovery(&self, node: &NodeId, from: usize) -> Option<(usize, NodeId)> {
        self.graph
            .neighbors(node.as_str())
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, n)| !self.visited.contains(&n.node) && !self.frontier.contains(&n.node))
            .map(|(j, n)| (j, n.node.clone()))
    }
}

impl Traversal for BfsStepper {
    fn algorithm(&self) -> &str {
        NAME
    }

    fn start(&self) -> &NodeId {
        &self.start
    }

    fn step(&mut self) -> StepOutcome {
        loop {
            let phase = std::mem::replace(&mut self.phase, Phase::Exhausted);
            let event = match phase {
                Phase::NotStarted => {
                    self.phase = Phase::Seed;
                    Event::Start {
                        algo: NAME.to_string(),
                        start: self.start.clone(),
                    }
                }
                Phase::Seed => {
                    self.frontier.push_back(self.start.clone());
                    self.phase = Phase::Dequeue;
                    Event::queue_push(self.queue_snapshot())
                }
                Phase::Dequeue => match self.frontier.pop_front() {
                    None => Event::End {
                        algo: NAME.to_string(),
                    },
                    Some(node) => {
                        // A stale entry ends this step at the pop.
                        self.phase = if self.visited.contains(&node) {
                            Phase::Dequeue
                        } else {
                            Phase::Mark(node.clone())
                        };
                        Event::queue_pop(node, self.queue_snapshot())
                    }
                },
                Phase::Mark(node) => {
                    self.visited.insert(node.clone());
                    self.visit_order.push(node.clone());
                    self.phase = Phase::Visit(node.clone());
                    Event::MarkVisited {
                        node,
                        visited: self.visit_order.clone(),
                    }
                }
                Phase::Visit(node) => {
                    self.phase = Phase::Expand {
                        node: node.clone(),
                        next: 0,
                    };
                    Event::VisitNode { node }
                }
                Phase::Expand { node, next } => match self.next_discovery(&node, next) {
                    Some((j, found)) => {
                        self.phase = Phase::Push {
                            node: node.clone(),
                            next: j + 1,
                            found: found.clone(),
                        };
                        Event::DiscoverEdge { u: node, v: found }
                    }
                    None => {
                        self.phase = Phase::Dequeue;
                        continue;
                    }
                },
                Phase::Push { node, next, found } => {
                    self.frontier.push_back(found);
                    self.phase = Phase::Expand { node, next };
                    Event::queue_push(self.queue_snapshot())
                }
                Phase::Exhausted => return StepOutcome::Exhausted,
            };
            return StepOutcome::Event(event);
        }
    }

    fn lifecycle(&self) -> Lifecycle {
        match self.phase {
            Phase::NotStarted => Lifecycle::NotStarted,
            Phase::Exhausted => Lifecycle::Exhausted,
            _ => Lifecycle::Running,
        }
    }

    fn visit_order(&self) -> &[NodeId] {
        &self.visit_order
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use petgraph::graph::{DiGraph, NodeIndex};
    use proptest::prelude::*;

    use super::*;
    use crate::event::EventKind::*;
    use crate::stepper::test_support::{graph, ids, kinds, run_all, visited_nodes};

    fn bfs(g: &Arc<Graph>, start: &str) -> BfsStepper {
        BfsStepper::new(Arc::clone(g), start.into())
    }

    #[test]
    fn chain_scenario_event_sequence() {
        let g = graph(false, &[("A", "B"), ("B", "C")]);
        let events = run_all(&mut bfs(&g, "A"));

        assert_eq!(
            kinds(&events),
            vec![
                Start, QueuePush,
                QueuePop, MarkVisited, VisitNode, DiscoverEdge, QueuePush,
                QueuePop, MarkVisited, VisitNode, DiscoverEdge, QueuePush,
                QueuePop, MarkVisited, VisitNode,
                End,
            ]
        );
        assert_eq!(events[1], Event::queue_push(Frontier::Queue(ids(&["A"]))));
        assert_eq!(events[2], Event::queue_pop("A".into(), Frontier::Queue(vec![])));
        assert_eq!(
            events[3],
            Event::MarkVisited { node: "A".into(), visited: ids(&["A"]) }
        );
        // B's expansion skips the already-visited A.
        assert_eq!(events[10], Event::DiscoverEdge { u: "B".into(), v: "C".into() });
        assert_eq!(
            events[13],
            Event::MarkVisited { node: "C".into(), visited: ids(&["A", "B", "C"]) }
        );
        assert_eq!(events[15], Event::End { algo: "bfs".into() });
    }

    #[test]
    fn one_event_per_step() {
        let g = graph(false, &[("A", "B"), ("A", "C")]);
        let mut s = bfs(&g, "A");
        assert_eq!(s.lifecycle(), Lifecycle::NotStarted);
        // start, queue_push, queue_pop, mark_visited
        let mut queued = Vec::new();
        for _ in 0..4 {
            assert!(matches!(s.step(), StepOutcome::Event(_)));
            queued.push(s.frontier().cloned().collect::<Vec<_>>());
        }
        assert_eq!(queued, vec![vec![], ids(&["A"]), vec![], vec![]]);
        assert_eq!(s.lifecycle(), Lifecycle::Running);
        assert_eq!(s.visit_order(), ids(&["A"]).as_slice());
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let g = graph(true, &[("A", "B")]);
        let mut s = bfs(&g, "A");
        let events = run_all(&mut s);
        assert_eq!(events.last().map(Event::kind), Some(End));
        for _ in 0..5 {
            assert_eq!(s.step(), StepOutcome::Exhausted);
        }
        assert!(s.is_exhausted());
        assert_eq!(s.visit_order(), ids(&["A", "B"]).as_slice());
    }

    #[test]
    fn frontier_pushes_reflect_queue_contents() {
        let g = graph(true, &[("A", "B"), ("A", "C"), ("A", "D")]);
        let events = run_all(&mut bfs(&g, "A"));
        let pushes: Vec<&[NodeId]> = events
            .iter()
            .filter_map(|e| match e {
                Event::QueuePush(p) => Some(p.frontier.nodes()),
                _ => None,
            })
            .collect();
        assert_eq!(
            pushes,
            vec![
                ids(&["A"]).as_slice(),
                ids(&["B"]).as_slice(),
                ids(&["B", "C"]).as_slice(),
                ids(&["B", "C", "D"]).as_slice(),
            ]
        );
    }

    #[test]
    fn self_loops_and_duplicate_edges_do_not_requeue() {
        let g = graph(true, &[("A", "A"), ("A", "B"), ("A", "B"), ("B", "A")]);
        let events = run_all(&mut bfs(&g, "A"));
        let discovered: Vec<_> = events
            .iter()
            .filter(|e| e.kind() == DiscoverEdge)
            .collect();
        assert_eq!(discovered.len(), 1);
        assert_eq!(visited_nodes(&events), ids(&["A", "B"]));
    }

    #[test]
    fn isolated_start_visits_only_itself() {
        let mut g = Graph::new(false, false);
        g.add_node("solo");
        g.add_edge("x", "y", None);
        let events = run_all(&mut BfsStepper::new(Arc::new(g), "solo".into()));
        assert_eq!(kinds(&events), vec![Start, QueuePush, QueuePop, MarkVisited, VisitNode, End]);
    }

    #[test]
    fn directed_edges_are_not_followed_backwards() {
        let g = graph(true, &[("B", "A"), ("B", "C")]);
        let events = run_all(&mut bfs(&g, "A"));
        assert_eq!(visited_nodes(&events), ids(&["A"]));
    }

    /// Builds the same graph twice: ours, and a petgraph copy used as a
    /// reference for hop distances. Undirected edges are mirrored explicitly.
    fn both(
        directed: bool,
        n: u8,
        edges: &[(u8, u8)],
    ) -> (Arc<Graph>, HashMap<NodeId, NodeIndex>, DiGraph<(), ()>) {
        let mut ours = Graph::new(directed, false);
        let mut reference = DiGraph::<(), ()>::new();
        let mut index = HashMap::new();
        for i in 0..n {
            ours.add_node(i.to_string());
            index.insert(NodeId::from(i.to_string()), reference.add_node(()));
        }
        for (u, v) in edges {
            ours.add_edge(u.to_string(), v.to_string(), None);
            let (a, b) = (index[&NodeId::from(u.to_string())], index[&NodeId::from(v.to_string())]);
            reference.add_edge(a, b, ());
            if !directed {
                reference.add_edge(b, a, ());
            }
        }
        (Arc::new(ours), index, reference)
    }

    proptest! {
        #[test]
        fn visits_exactly_the_reachable_set_in_breadth_first_order(
            n in 1u8..10,
            raw in prop::collection::vec((0u8..10, 0u8..10), 0..30),
            directed in any::<bool>(),
        ) {
            let edges: Vec<(u8, u8)> = raw.into_iter().map(|(u, v)| (u % n, v % n)).collect();
            let (g, index, reference) = both(directed, n, &edges);
            let events = run_all(&mut BfsStepper::new(Arc::clone(&g), "0".into()));
            let order = visited_nodes(&events);

            let hops = petgraph::algo::dijkstra(&reference, index[&NodeId::from("0")], None, |_| 1u32);

            // Same node set as the reference reachability.
            prop_assert_eq!(order.len(), hops.len());
            for node in &order {
                prop_assert!(hops.contains_key(&index[node]));
            }

            // Hop distance never decreases along the visit order.
            let dists: Vec<u32> = order.iter().map(|node| hops[&index[node]]).collect();
            prop_assert!(dists.windows(2).all(|w| w[0] <= w[1]), "order {:?} dists {:?}", order, dists);

            // No node marked twice.
            let marks = events.iter().filter(|e| e.kind() == MarkVisited).count();
            prop_assert_eq!(marks, order.len());
        }
    }
}

//! Depth-first traversal over an explicit frame stack.
//!
//! Recursion is replaced by a stack of [`Frame`]s, each holding a node and
//! the index of the next neighbor to examine. A frame's scan always resumes
//! from that index, never rescanning a prefix, which is what lets the
//! traversal stop between any two neighbor expansions.
//!
//! When the top frame has no unvisited neighbor left it is popped. That pop
//! has nothing to report, so the step returns [`StepOutcome::Silent`].

use std::collections::HashSet;
use std::sync::Arc;

use algolab_core::{Graph, NodeId};

use super::{Lifecycle, StepOutcome, Traversal};
use crate::event::{Event, Frontier};

const NAME: &str = "dfs";

/// A node mid-expansion.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub node: NodeId,
    /// Index of the next neighbor to examine.
    pub next: usize,
}

#[derive(Debug, Clone)]
enum Phase {
    NotStarted,
    Seed,
    /// Look at the top frame: end, first inspection, or resume its scan.
    Inspect,
    Mark(NodeId),
    Visit(NodeId),
    Scan,
    Push(NodeId),
    Exhausted,
}

/// Depth-first stepper.
#[derive(Debug)]
pub struct DfsStepper {
    graph: Arc<Graph>,
    start: NodeId,
    visited: HashSet<NodeId>,
    visit_order: Vec<NodeId>,
    stack: Vec<Frame>,
    phase: Phase,
}

impl DfsStepper {
    pub fn new(graph: Arc<Graph>, start: NodeId) -> Self {
        DfsStepper {
            graph,
            start,
            visited: HashSet::new(),
            visit_order: Vec::new(),
            stack: Vec::new(),
            phase: Phase::NotStarted,
        }
    }

    /// Current frames, bottom first.
    pub fn frames(&self) -> &[Frame] {
        &self.stack
    }

    fn stack_snapshot(&self, depth: usize) -> Frontier {
        Frontier::Stack(self.stack[..depth].iter().map(|f| f.node.clone()).collect())
    }

    /// First unvisited neighbor of the top frame at or after its resume index.
    fn next_unvisited(&self, frame: &Frame) -> Option<(usize, NodeId)> {
        self.graph
            .neighbors(frame.node.as_str())
            .iter()
            .enumerate()
            .skip(frame.next)
            .find(|(_, n)| !self.visited.contains(&n.node))
            .map(|(j, n)| (j, n.node.clone()))
    }
}

impl Traversal for DfsStepper {
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
                    self.stack.push(Frame {
                        node: self.start.clone(),
                        next: 0,
                    });
                    self.phase = Phase::Inspect;
                    Event::queue_push(self.stack_snapshot(self.stack.len()))
                }
                Phase::Inspect => match self.stack.last() {
                    None => Event::End {
                        algo: NAME.to_string(),
                    },
                    Some(top) if !self.visited.contains(&top.node) => {
                        let node = top.node.clone();
                        self.phase = Phase::Mark(node.clone());
                        Event::queue_pop(node, self.stack_snapshot(self.stack.len() - 1))
                    }
                    Some(_) => {
                        self.phase = Phase::Scan;
                        continue;
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
                    self.phase = Phase::Scan;
                    Event::VisitNode { node }
                }
                Phase::Scan => {
                    let Some(top) = self.stack.last() else {
                        self.phase = Phase::Inspect;
                        continue;
                    };
                    match self.next_unvisited(top) {
                        Some((j, v)) => {
                            let u = top.node.clone();
                            if let Some(top) = self.stack.last_mut() {
                                top.next = j + 1;
                            }
                            self.phase = Phase::Push(v.clone());
                            Event::DiscoverEdge { u, v }
                        }
                        None => {
                            self.stack.pop();
                            self.phase = Phase::Inspect;
                            return StepOutcome::Silent;
                        }
                    }
                }
                Phase::Push(v) => {
                    self.stack.push(Frame { node: v, next: 0 });
                    self.phase = Phase::Inspect;
                    Event::queue_push(self.stack_snapshot(self.stack.len()))
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
    use petgraph::visit::{Dfs, Walker};
    use proptest::prelude::*;

    use super::*;
    use crate::event::EventKind::*;
    use crate::stepper::test_support::{graph, ids, kinds, run_all, visited_nodes};

    fn dfs(g: &Arc<Graph>, start: &str) -> DfsStepper {
        DfsStepper::new(Arc::clone(g), start.into())
    }

    #[test]
    fn chain_scenario_visit_order() {
        let g = graph(false, &[("A", "B"), ("B", "C")]);
        let mut s = dfs(&g, "A");
        let events = run_all(&mut s);
        assert_eq!(visited_nodes(&events), ids(&["A", "B", "C"]));
        assert_eq!(s.visit_order(), ids(&["A", "B", "C"]).as_slice());
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
        assert_eq!(events[1], Event::queue_push(Frontier::Stack(ids(&["A"]))));
        assert_eq!(events[6], Event::queue_push(Frontier::Stack(ids(&["A", "B"]))));
        assert_eq!(events[7], Event::queue_pop("B".into(), Frontier::Stack(ids(&["A"]))));
    }

    #[test]
    fn backtracking_pops_are_silent() {
        let g = graph(false, &[("A", "B"), ("B", "C")]);
        let mut s = dfs(&g, "A");
        let mut outcomes = Vec::new();
        loop {
            let outcome = s.step();
            if outcome == StepOutcome::Exhausted {
                break;
            }
            outcomes.push(outcome);
        }
        // C, B and A frames are each popped once.
        let silent = outcomes.iter().filter(|o| **o == StepOutcome::Silent).count();
        assert_eq!(silent, 3);
        assert!(matches!(
            outcomes.last(),
            Some(StepOutcome::Event(Event::End { .. }))
        ));
    }

    #[test]
    fn branches_go_deep_before_wide() {
        // A -> B -> D, A -> C
        let g = graph(true, &[("A", "B"), ("A", "C"), ("B", "D")]);
        let events = run_all(&mut dfs(&g, "A"));
        assert_eq!(visited_nodes(&events), ids(&["A", "B", "D", "C"]));

        let discovered: Vec<(String, String)> = events
            .iter()
            .filter_map(|e| match e {
                Event::DiscoverEdge { u, v } => Some((u.to_string(), v.to_string())),
                _ => None,
            })
            .collect();
        assert_eq!(
            discovered,
            vec![
                ("A".to_string(), "B".to_string()),
                ("B".to_string(), "D".to_string()),
                ("A".to_string(), "C".to_string()),
            ]
        );
    }

    #[test]
    fn resumed_frame_keeps_scan_position() {
        let g = graph(true, &[("A", "B"), ("A", "C"), ("A", "D")]);
        let mut s = dfs(&g, "A");
        // start, push, pop A, mark, visit, discover A->B
        for _ in 0..6 {
            s.step();
        }
        assert_eq!(s.frames(), &[Frame { node: "A".into(), next: 1 }]);
        s.step(); // push B
        assert_eq!(s.frames().len(), 2);
    }

    #[test]
    fn self_loop_and_isolated_start() {
        let g = graph(true, &[("A", "A")]);
        let events = run_all(&mut dfs(&g, "A"));
        assert_eq!(kinds(&events), vec![Start, QueuePush, QueuePop, MarkVisited, VisitNode, End]);
    }

    #[test]
    fn exhaustion_is_idempotent() {
        let g = graph(false, &[("A", "B")]);
        let mut s = dfs(&g, "A");
        run_all(&mut s);
        for _ in 0..3 {
            assert_eq!(s.step(), StepOutcome::Exhausted);
        }
        assert_eq!(s.lifecycle(), Lifecycle::Exhausted);
        assert_eq!(s.visit_order().len(), 2);
    }

    proptest! {
        #[test]
        fn visits_exactly_the_reachable_set_once(
            n in 1u8..10,
            raw in prop::collection::vec((0u8..10, 0u8..10), 0..30),
            directed in any::<bool>(),
        ) {
            let edges: Vec<(u8, u8)> = raw.into_iter().map(|(u, v)| (u % n, v % n)).collect();

            let mut ours = Graph::new(directed, false);
            let mut reference = DiGraph::<(), ()>::new();
            let mut index: HashMap<NodeId, NodeIndex> = HashMap::new();
            for i in 0..n {
                ours.add_node(i.to_string());
                index.insert(NodeId::from(i.to_string()), reference.add_node(()));
            }
            for (u, v) in &edges {
                ours.add_edge(u.to_string(), v.to_string(), None);
                let a = index[&NodeId::from(u.to_string())];
                let b = index[&NodeId::from(v.to_string())];
                reference.add_edge(a, b, ());
                if !directed {
                    reference.add_edge(b, a, ());
                }
            }

            let events = run_all(&mut DfsStepper::new(Arc::new(ours), "0".into()));
            let order = visited_nodes(&events);

            let reachable = Dfs::new(&reference, index[&NodeId::from("0")]).iter(&reference).count();
            prop_assert_eq!(order.len(), reachable);

            let mut seen = std::collections::HashSet::new();
            prop_assert!(order.iter().all(|node| seen.insert(node.clone())));
            prop_assert_eq!(events.iter().filter(|e| e.kind() == MarkVisited).count(), order.len());
        }
    }
}

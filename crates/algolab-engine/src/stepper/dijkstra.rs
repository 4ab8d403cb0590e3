//! Single-source shortest paths (Dijkstra) as a resumable state machine.
//!
//! Uses a binary heap with lazy deletion: an improved distance pushes a new
//! entry and older entries for a settled node are discarded when popped.
//! Ties on distance are broken by push order. Absent weights count as `1.0`,
//! so on an unweighted graph distances are hop counts.
//!
//! Per relaxed neighbor the events are `relax_edge`, then (only when the
//! candidate improves the tentative distance) `dist_update` and `pq_push`.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;

use algolab_core::{Graph, NodeId};

use super::{Lifecycle, StepOutcome, Traversal};
use crate::error::EngineError;
use crate::event::{Event, PqEntry};

const NAME: &str = "dijkstra";

const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone)]
struct QueueItem {
    dist: f64,
    seq: u64,
    node: NodeId,
}

impl QueueItem {
    fn priority(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

impl PartialEq for QueueItem {
    fn eq(&self, other: &Self) -> bool {
        self.priority(other) == Ordering::Equal
    }
}

impl Eq for QueueItem {}

impl PartialOrd for QueueItem {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Reversed so `BinaryHeap` pops the smallest distance first.
impl Ord for QueueItem {
    fn cmp(&self, other: &Self) -> Ordering {
        other.priority(self)
    }
}

#[derive(Debug, Clone)]
enum Phase {
    NotStarted,
    Seed,
    SeedPush,
    Dequeue,
    Mark { node: NodeId, dist: f64 },
    Visit { node: NodeId, dist: f64 },
    Relax { node: NodeId, dist: f64, next: usize },
    Update { node: NodeId, dist: f64, next: usize, target: NodeId, candidate: f64 },
    Push { node: NodeId, dist: f64, next: usize, target: NodeId, candidate: f64 },
    Exhausted,
}

/// Shortest-path stepper.
#[derive(Debug)]
pub struct DijkstraStepper {
    graph: Arc<Graph>,
    start: NodeId,
    settled: HashSet<NodeId>,
    visit_order: Vec<NodeId>,
    dist: IndexMap<NodeId, f64>,
    prev: IndexMap<NodeId, Option<NodeId>>,
    heap: BinaryHeap<QueueItem>,
    next_seq: u64,
    phase: Phase,
}

impl DijkstraStepper {
    /// Fails with [`EngineError::NegativeWeight`] if any edge weight is
    /// negative.
    pub fn new(graph: Arc<Graph>, start: NodeId) -> Result<Self, EngineError> {
        if graph.min_weight().is_some_and(|w| w < 0.0) {
            if let Some((u, n)) = graph
                .arcs()
                .find(|(_, n)| n.weight.is_some_and(|w| w < 0.0))
            {
                return Err(EngineError::NegativeWeight {
                    u: u.clone(),
                    v: n.node.clone(),
                    weight: n.weight.unwrap_or_default(),
                });
            }
        }

        Ok(DijkstraStepper {
            graph,
            start,
            settled: HashSet::new(),
            visit_order: Vec::new(),
            dist: IndexMap::new(),
            prev: IndexMap::new(),
            heap: BinaryHeap::new(),
            next_seq: 0,
            phase: Phase::NotStarted,
        })
    }

    /// Tentative (or, once settled, final) distances of reached nodes.
    pub fn distances(&self) -> &IndexMap<NodeId, f64> {
        &self.dist
    }

    pub fn predecessors(&self) -> &IndexMap<NodeId, Option<NodeId>> {
        &self.prev
    }

    /// Path from the start to `target` along recorded predecessors, or
    /// `None` if `target` has not been reached.
    pub fn path_to(&self, target: &str) -> Option<Vec<NodeId>> {
        let (mut current, mut parent) = self.prev.get_key_value(target)?;
        let mut path = vec![current.clone()];
        while let Some(p) = parent {
            if path.len() > self.prev.len() {
                break;
            }
            path.push(p.clone());
            current = p;
            parent = self.prev.get(current)?;
        }
        path.reverse();
        Some(path)
    }

    fn push(&mut self, node: NodeId, dist: f64) {
        self.heap.push(QueueItem {
            dist,
            seq: self.next_seq,
            node,
        });
        self.next_seq += 1;
    }

    fn pq_snapshot(&self) -> Vec<PqEntry> {
        let mut items: Vec<&QueueItem> = self.heap.iter().collect();
        items.sort_by(|a, b| a.priority(b));
        items
            .into_iter()
            .map(|item| PqEntry(item.dist, item.node.clone()))
            .collect()
    }

    fn dist_update(&self, node: NodeId) -> Event {
        Event::DistUpdate {
            node,
            dist: self.dist.clone(),
            prev: self.prev.clone(),
        }
    }

    /// First unsettled neighbor of `node` at or after `from`, with its weight.
    fn next_relaxation(&self, node: &NodeId, from: usize) -> Option<(usize, NodeId, f64)> {
        self.graph
            .neighbors(node.as_str())
            .iter()
            .enumerate()
            .skip(from)
            .find(|(_, n)| !self.settled.contains(&n.node))
            .map(|(j, n)| (j, n.node.clone(), n.weight.unwrap_or(DEFAULT_WEIGHT)))
    }
}

impl Traversal for DijkstraStepper {
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
                    self.dist.insert(self.start.clone(), 0.0);
                    self.prev.insert(self.start.clone(), None);
                    self.phase = Phase::SeedPush;
                    self.dist_update(self.start.clone())
                }
                Phase::SeedPush => {
                    self.push(self.start.clone(), 0.0);
                    self.phase = Phase::Dequeue;
                    Event::PqPush {
                        node: self.start.clone(),
                        dist: 0.0,
                        pq: self.pq_snapshot(),
                    }
                }
                Phase::Dequeue => match self.heap.pop() {
                    None => Event::End {
                        algo: NAME.to_string(),
                    },
                    Some(QueueItem { dist, node, .. }) => {
                        // Entries for settled nodes are stale; the step ends at the pop.
                        self.phase = if self.settled.contains(&node) {
                            Phase::Dequeue
                        } else {
                            Phase::Mark {
                                node: node.clone(),
                                dist,
                            }
                        };
                        Event::PqPop {
                            node,
                            dist,
                            pq: self.pq_snapshot(),
                        }
                    }
                },
                Phase::Mark { node, dist } => {
                    self.settled.insert(node.clone());
                    self.visit_order.push(node.clone());
                    self.phase = Phase::Visit {
                        node: node.clone(),
                        dist,
                    };
                    Event::MarkVisited {
                        node,
                        visited: self.visit_order.clone(),
                    }
                }
                Phase::Visit { node, dist } => {
                    self.phase = Phase::Relax {
                        node: node.clone(),
                        dist,
                        next: 0,
                    };
                    Event::VisitNode { node }
                }
                Phase::Relax { node, dist, next } => match self.next_relaxation(&node, next) {
                    Some((j, target, w)) => {
                        let candidate = dist + w;
                        let improves = self
                            .dist
                            .get(&target)
                            .map_or(true, |current| candidate < *current);
                        let event = Event::RelaxEdge {
                            u: node.clone(),
                            v: target.clone(),
                            w,
                            candidate,
                        };
                        self.phase = if improves {
                            Phase::Update {
                                node,
                                dist,
                                next: j + 1,
                                target,
                                candidate,
                            }
                        } else {
                            Phase::Relax {
                                node,
                                dist,
                                next: j + 1,
                            }
                        };
                        event
                    }
                    None => {
                        self.phase = Phase::Dequeue;
                        continue;
                    }
                },
                Phase::Update {
                    node,
                    dist,
                    next,
                    target,
                    candidate,
                } => {
                    self.dist.insert(target.clone(), candidate);
                    self.prev.insert(target.clone(), Some(node.clone()));
                    let event = self.dist_update(target.clone());
                    self.phase = Phase::Push {
                        node,
                        dist,
                        next,
                        target,
                        candidate,
                    };
                    event
                }
                Phase::Push {
                    node,
                    dist,
                    next,
                    target,
                    candidate,
                } => {
                    self.push(target.clone(), candidate);
                    self.phase = Phase::Relax { node, dist, next };
                    Event::PqPush {
                        node: target,
                        dist: candidate,
                        pq: self.pq_snapshot(),
                    }
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

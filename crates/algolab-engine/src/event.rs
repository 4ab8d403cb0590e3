//! Event vocabulary emitted by traversal steppers.
//!
//! Every observable action of a traversal is one [`Event`]. The enum is
//! closed and each kind carries its own payload shape. On the wire an event
//! is adjacently tagged:
//!
//! ```json
//! {"type": "queue_push", "data": {"queue": ["A", "B"]}}
//! ```
//!
//! Payload field names (`node`, `queue`, `stack`, `visited`, `u`, `v`, ...)
//! are consumed by renderers and must stay stable.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use algolab_core::NodeId;

/// The kind tag of an [`Event`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Start,
    /// Reserved. No built-in traversal emits it.
    Step,
    VisitNode,
    DiscoverEdge,
    QueuePush,
    QueuePop,
    MarkVisited,
    PqPush,
    PqPop,
    DistUpdate,
    RelaxEdge,
    End,
}

impl EventKind {
    /// Wire name of the kind, as used in the `type` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::Start => "start",
            EventKind::Step => "step",
            EventKind::VisitNode => "visit_node",
            EventKind::DiscoverEdge => "discover_edge",
            EventKind::QueuePush => "queue_push",
            EventKind::QueuePop => "queue_pop",
            EventKind::MarkVisited => "mark_visited",
            EventKind::PqPush => "pq_push",
            EventKind::PqPop => "pq_pop",
            EventKind::DistUpdate => "dist_update",
            EventKind::RelaxEdge => "relax_edge",
            EventKind::End => "end",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a traversal frontier. BFS reports a FIFO `queue`, DFS a
/// `stack` listed bottom to top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frontier {
    Queue(Vec<NodeId>),
    Stack(Vec<NodeId>),
}

impl Frontier {
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Frontier::Queue(nodes) | Frontier::Stack(nodes) => nodes,
        }
    }
}

/// Payload of [`Event::QueuePush`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePush {
    #[serde(flatten)]
    pub frontier: Frontier,
}

/// Payload of [`Event::QueuePop`]: the removed node and what is left.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueuePop {
    pub node: NodeId,
    #[serde(flatten)]
    pub frontier: Frontier,
}

/// One priority-queue entry, serialized as `[dist, node]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PqEntry(pub f64, pub NodeId);

/// One observable action of a traversal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Event {
    Start {
        algo: String,
        start: NodeId,
    },
    VisitNode {
        node: NodeId,
    },
    DiscoverEdge {
        u: NodeId,
        v: NodeId,
    },
    QueuePush(QueuePush),
    QueuePop(QueuePop),
    MarkVisited {
        node: NodeId,
        /// Visit order so far, including `node`.
        visited: Vec<NodeId>,
    },
    PqPush {
        node: NodeId,
        dist: f64,
        pq: Vec<PqEntry>,
    },
    PqPop {
        node: NodeId,
        dist: f64,
        pq: Vec<PqEntry>,
    },
    DistUpdate {
        node: NodeId,
        /// Tentative distance of every reached node.
        dist: IndexMap<NodeId, f64>,
        /// Predecessor of every reached node (`null` for the start).
        prev: IndexMap<NodeId, Option<NodeId>>,
    },
    RelaxEdge {
        u: NodeId,
        v: NodeId,
        w: f64,
        candidate: f64,
    },
    End {
        algo: String,
    },
}

impl Event {
    pub fn kind(&self) -> EventKind {
        match self {
            Event::Start { .. } => EventKind::Start,
            Event::VisitNode { .. } => EventKind::VisitNode,
            Event::DiscoverEdge { .. } => EventKind::DiscoverEdge,
            Event::QueuePush(_) => EventKind::QueuePush,
            Event::QueuePop(_) => EventKind::QueuePop,
            Event::MarkVisited { .. } => EventKind::MarkVisited,
            Event::PqPush { .. } => EventKind::PqPush,
            Event::PqPop { .. } => EventKind::PqPop,
            Event::DistUpdate { .. } => EventKind::DistUpdate,
            Event::RelaxEdge { .. } => EventKind::RelaxEdge,
            Event::End { .. } => EventKind::End,
        }
    }

    pub(crate) fn queue_push(frontier: Frontier) -> Self {
        Event::QueuePush(QueuePush { frontier })
    }

    pub(crate) fn queue_pop(node: NodeId, frontier: Frontier) -> Self {
        Event::QueuePop(QueuePop { node, frontier })
    }
}

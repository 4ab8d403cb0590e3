//! Stepper factory and the uniform advance operation.
//!
//! [`Runner`] maps algorithm names to constructors. The built-in
//! [`Algorithm`]s are registered by [`Runner::new`]; further traversals can
//! be added with [`Runner::register`].
//!
//! [`Runner::advance`] is what callers drive: it returns the next
//! [`Event`] or [`Advance::End`], folding silent steps so every call that is
//! not at the end yields exactly one event.

use std::sync::Arc;

use indexmap::IndexMap;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use algolab_core::{Graph, NodeId};

use crate::error::EngineError;
use crate::event::Event;
use crate::stepper::{Algorithm, BfsStepper, DfsStepper, DijkstraStepper, StepOutcome, Stepper};

/// Constructor stored in the registry. The start node is checked against
/// the graph before the factory runs.
pub type StepperFactory = fn(Arc<Graph>, NodeId) -> Result<Stepper, EngineError>;

/// Result of one [`Runner::advance`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    Event(Event),
    /// The traversal is over. Returned on every call after the `end` event.
    End,
}

impl Advance {
    pub fn event(&self) -> Option<&Event> {
        match self {
            Advance::Event(e) => Some(e),
            Advance::End => None,
        }
    }

    pub fn is_end(&self) -> bool {
        matches!(self, Advance::End)
    }
}

#[derive(Serialize)]
struct EmptyData {}

// `End` is written as `{"type": "end", "data": {}}`, the marker clients
// already expect after the algorithm's own `end` event.
impl Serialize for Advance {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Advance::Event(event) => event.serialize(serializer),
            Advance::End => {
                let mut state = serializer.serialize_struct("Advance", 2)?;
                state.serialize_field("type", "end")?;
                state.serialize_field("data", &EmptyData {})?;
                state.end()
            }
        }
    }
}

fn create_bfs(graph: Arc<Graph>, start: NodeId) -> Result<Stepper, EngineError> {
    Ok(Stepper::Bfs(BfsStepper::new(graph, start)))
}

fn create_dfs(graph: Arc<Graph>, start: NodeId) -> Result<Stepper, EngineError> {
    Ok(Stepper::Dfs(DfsStepper::new(graph, start)))
}

fn create_dijkstra(graph: Arc<Graph>, start: NodeId) -> Result<Stepper, EngineError> {
    DijkstraStepper::new(graph, start).map(Stepper::Dijkstra)
}

impl Algorithm {
    pub fn factory(&self) -> StepperFactory {
        match self {
            Algorithm::Bfs => create_bfs,
            Algorithm::Dfs => create_dfs,
            Algorithm::Dijkstra => create_dijkstra,
        }
    }
}

/// Registry of traversal constructors.
#[derive(Debug, Clone)]
pub struct Runner {
    registry: IndexMap<String, StepperFactory>,
}

impl Runner {
    /// Creates a runner with every built-in [`Algorithm`] registered.
    pub fn new() -> Self {
        let mut runner = Runner {
            registry: IndexMap::new(),
        };
        for algo in Algorithm::ALL {
            runner.register(algo.name(), algo.factory());
        }
        runner
    }

    /// Registers (or replaces) a constructor under `name`. Returns the
    /// previous constructor, if any.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        factory: StepperFactory,
    ) -> Option<StepperFactory> {
        self.registry.insert(name.into(), factory)
    }

    /// Registered names in registration order.
    pub fn algorithms(&self) -> impl Iterator<Item = &str> {
        self.registry.keys().map(String::as_str)
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.registry.contains_key(name)
    }

    /// Builds a fresh stepper for `name` over `graph` starting at `start`.
    pub fn create(
        &self,
        name: &str,
        graph: Arc<Graph>,
        start: NodeId,
    ) -> Result<Stepper, EngineError> {
        let factory = self
            .registry
            .get(name)
            .ok_or_else(|| EngineError::UnknownAlgorithm {
                name: name.to_string(),
            })?;
        if !graph.contains_node(start.as_str()) {
            return Err(EngineError::StartNodeNotFound { node: start });
        }
        factory(graph, start)
    }

    /// Advances `stepper` to its next event, or reports the end.
    ///
    /// Idempotent once exhausted: every later call returns [`Advance::End`]
    /// without touching the stepper's state.
    pub fn advance(stepper: &mut Stepper) -> Advance {
        loop {
            match stepper.step() {
                StepOutcome::Event(event) => return Advance::Event(event),
                StepOutcome::Silent => continue,
                StepOutcome::Exhausted => return Advance::End,
            }
        }
    }

    /// Advances up to `limit` times, stopping after the first
    /// [`Advance::End`], which is included.
    pub fn drain(stepper: &mut Stepper, limit: usize) -> Vec<Advance> {
        let mut out = Vec::new();
        for _ in 0..limit {
            let advance = Self::advance(stepper);
            let done = advance.is_end();
            out.push(advance);
            if done {
                break;
            }
        }
        out
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

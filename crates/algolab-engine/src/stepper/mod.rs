//! Resumable traversal state machines.
//!
//! A stepper is an algorithm whose execution state lives in explicit fields
//! instead of a call stack, so it can stop after any single event and pick up
//! exactly where it left off. Each built-in stepper follows the lifecycle
//! `NotStarted -> Running -> Exhausted`.
//!
//! [`Traversal::step`] performs one unit of progress and reports a
//! [`StepOutcome`]: usually one [`Event`], occasionally
//! [`StepOutcome::Silent`] when the unit only changed internal state (a DFS
//! backtrack), and [`StepOutcome::Exhausted`] forever once the traversal has
//! finished.

pub mod bfs;
pub mod dfs;
pub mod dijkstra;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use algolab_core::NodeId;

use crate::error::EngineError;
use crate::event::Event;

pub use bfs::BfsStepper;
pub use dfs::DfsStepper;
pub use dijkstra::DijkstraStepper;

/// Result of a single [`Traversal::step`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The step produced one observable event.
    Event(Event),
    /// The step advanced internal state without anything to report.
    Silent,
    /// The traversal already emitted its `end` event.
    Exhausted,
}

/// Coarse lifecycle state of a stepper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lifecycle {
    NotStarted,
    Running,
    Exhausted,
}

/// A resumable traversal.
///
/// Implemented by the built-in steppers and usable for custom algorithms
/// registered with [`crate::Runner::register`].
pub trait Traversal: Send {
    /// Registry name of the algorithm (`"bfs"`, `"dfs"`, ...).
    fn algorithm(&self) -> &str;

    fn start(&self) -> &NodeId;

    /// Advances by one unit of progress.
    fn step(&mut self) -> StepOutcome;

    fn lifecycle(&self) -> Lifecycle;

    /// Nodes in the order they were marked visited.
    fn visit_order(&self) -> &[NodeId];

    fn is_exhausted(&self) -> bool {
        self.lifecycle() == Lifecycle::Exhausted
    }
}

/// The built-in traversal algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Bfs,
    Dfs,
    Dijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Bfs, Algorithm::Dfs, Algorithm::Dijkstra];

    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::Bfs => "bfs",
            Algorithm::Dfs => "dfs",
            Algorithm::Dijkstra => "dijkstra",
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| EngineError::UnknownAlgorithm { name: s.to_string() })
    }
}

/// A live traversal owned by exactly one caller.
///
/// The built-in algorithms are concrete variants; anything else registered
/// at runtime is carried as [`Stepper::Custom`].
pub enum Stepper {
    Bfs(BfsStepper),
    Dfs(DfsStepper),
    Dijkstra(DijkstraStepper),
    Custom(Box<dyn Traversal>),
}

impl Stepper {
    fn traversal(&self) -> &dyn Traversal {
        match self {
            Stepper::Bfs(s) => s,
            Stepper::Dfs(s) => s,
            Stepper::Dijkstra(s) => s,
            Stepper::Custom(s) => s.as_ref(),
        }
    }

    fn traversal_mut(&mut self) -> &mut dyn Traversal {
        match self {
            Stepper::Bfs(s) => s,
            Stepper::Dfs(s) => s,
            Stepper::Dijkstra(s) => s,
            Stepper::Custom(s) => s.as_mut(),
        }
    }

    pub fn algorithm(&self) -> &str {
        self.traversal().algorithm()
    }

    pub fn start(&self) -> &NodeId {
        self.traversal().start()
    }

    pub fn step(&mut self) -> StepOutcome {
        self.traversal_mut().step()
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.traversal().lifecycle()
    }

    pub fn visit_order(&self) -> &[NodeId] {
        self.traversal().visit_order()
    }

    pub fn is_exhausted(&self) -> bool {
        self.traversal().is_exhausted()
    }
}

impl fmt::Debug for Stepper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stepper")
            .field("algorithm", &self.algorithm())
            .field("start", self.start())
            .field("lifecycle", &self.lifecycle())
            .field("visited", &self.visit_order().len())
            .finish()
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn algorithm_names_roundtrip() {
        for algo in Algorithm::ALL {
            assert_eq!(algo.name().parse::<Algorithm>().unwrap(), algo);
            assert_eq!(algo.to_string(), algo.name());
        }
    }

    #[test]
    fn unknown_algorithm_name() {
        let err = "dijkstra-typo".parse::<Algorithm>().unwrap_err();
        assert_eq!(
            err,
            EngineError::UnknownAlgorithm {
                name: "dijkstra-typo".into()
            }
        );
    }
}

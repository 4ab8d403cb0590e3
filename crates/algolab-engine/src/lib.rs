//! Resumable, step-driven graph traversals.
//!
//! Every algorithm is a [`Stepper`]: a state machine that emits one
//! [`Event`] per advance and can be paused between any two events. The
//! [`Runner`] builds steppers by name and drives them uniformly.
//!
//! ```
//! use std::sync::Arc;
//! use algolab_core::Graph;
//! use algolab_engine::{Advance, Runner};
//!
//! let mut g = Graph::new(false, false);
//! g.add_edge("A", "B", None);
//! let mut stepper = Runner::new().create("bfs", Arc::new(g), "A".into()).unwrap();
//! while let Advance::Event(event) = Runner::advance(&mut stepper) {
//!     println!("{}", event.kind());
//! }
//! ```

pub mod error;
pub mod event;
pub mod runner;
pub mod stepper;

pub use error::EngineError;
pub use event::{Event, EventKind, Frontier, PqEntry};
pub use runner::{Advance, Runner, StepperFactory};
pub use stepper::{
    Algorithm, BfsStepper, DfsStepper, DijkstraStepper, Lifecycle, StepOutcome, Stepper, Traversal,
};

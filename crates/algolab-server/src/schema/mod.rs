//! API schema types for request/response definitions.
//!
//! Types use serde derives for JSON serialization/deserialization. Step
//! responses reuse [`algolab_engine::Advance`] directly.

pub mod sessions;

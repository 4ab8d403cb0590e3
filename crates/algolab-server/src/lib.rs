//! HTTP/WebSocket service for stepping graph traversals.
//!
//! Clients post a graph, pick an algorithm, and then pull events one at a
//! time (`POST /sessions/{id}/step`), stream them (`GET /sessions/{id}/play`),
//! or drive them over a socket (`GET /ws/sessions/{id}`). This crate holds
//! the session store, API schema types, error mapping, and routes.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod schema;
pub mod session;
pub mod state;

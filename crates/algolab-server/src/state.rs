//! Shared application state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use algolab_engine::Runner;

use crate::config::ServerConfig;
use crate::session::SessionStore;

/// Shared application state for the HTTP server.
///
/// Everything is behind `Arc`, so cloning per request is cheap. The runner
/// is immutable after startup; per-session exclusion lives in the
/// [`SessionStore`].
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub runner: Arc<Runner>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Creates the state with the built-in algorithms registered.
    ///
    /// When the configuration sets a session TTL, this also starts the idle
    /// sweep, so it must be called inside a tokio runtime in that case.
    pub fn new(config: ServerConfig) -> Self {
        Self::with_runner(config, Runner::new())
    }

    pub fn with_runner(config: ServerConfig, runner: Runner) -> Self {
        let sessions = Arc::new(SessionStore::new());
        if let Some(ttl) = config.session_ttl {
            // Sweep at a quarter of the TTL, at most once a minute.
            let interval = (ttl / 4).clamp(Duration::from_secs(1), Duration::from_secs(60));
            sessions.start_expiry_sweep(ttl, interval);
        }

        AppState {
            sessions,
            runner: Arc::new(runner),
            config: Arc::new(config),
        }
    }
}

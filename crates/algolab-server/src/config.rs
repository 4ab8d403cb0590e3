//! Server configuration read from environment variables.
//!
//! | Variable                   | Default   |
//! |----------------------------|-----------|
//! | `ALGOLAB_HOST`             | `0.0.0.0` |
//! | `ALGOLAB_PORT`             | `8000`    |
//! | `ALGOLAB_TRACE_EVENTS`     | `true`    |
//! | `ALGOLAB_PLAY_INTERVAL_MS` | `250`     |
//! | `ALGOLAB_SESSION_TTL_SECS` | `0` (sessions never expire) |

use std::str::FromStr;
use std::time::Duration;

/// Runtime settings for the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Record every emitted event in the session history.
    pub trace_events: bool,
    /// Delay between events when a session is played automatically.
    pub play_interval: Duration,
    /// Idle time after which a session is dropped. `None` disables expiry.
    pub session_ttl: Option<Duration>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8000,
            trace_events: true,
            play_interval: Duration::from_millis(250),
            session_ttl: None,
        }
    }
}

impl ServerConfig {
    /// Reads the configuration from the process environment. Unparsable
    /// values are logged and replaced by their default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = ServerConfig::default();

        let host = lookup("ALGOLAB_HOST").unwrap_or(defaults.host);
        let port = parse_or("ALGOLAB_PORT", &lookup, defaults.port);
        let trace_events = parse_or("ALGOLAB_TRACE_EVENTS", &lookup, defaults.trace_events);
        let play_interval_ms = parse_or(
            "ALGOLAB_PLAY_INTERVAL_MS",
            &lookup,
            defaults.play_interval.as_millis() as u64,
        );
        let ttl_secs: u64 = parse_or("ALGOLAB_SESSION_TTL_SECS", &lookup, 0);

        ServerConfig {
            host,
            port,
            trace_events,
            play_interval: Duration::from_millis(play_interval_ms.max(1)),
            session_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
        }
    }

    /// `host:port` for binding the listener.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(key: &str, lookup: &impl Fn(&str) -> Option<String>, default: T) -> T {
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("ignoring invalid {}={:?}, using default", key, raw);
                default
            }
        },
    }
}

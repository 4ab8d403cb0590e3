//! Traversal sessions and the in-memory session store.
//!
//! A [`Session`] binds one graph to one live [`Stepper`]. The
//! [`SessionStore`] hands out sessions as `Arc<tokio::sync::Mutex<Session>>`:
//! the mutex serializes advances on a single session, while the `DashMap`
//! lets different sessions be looked up and advanced without contending.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use algolab_core::{Graph, NodeId};
use algolab_engine::{Advance, Event, Runner, Stepper};

/// Opaque session identifier (UUID v4 newtype).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }

    /// Parses a client-supplied id. Anything that is not a UUID cannot name
    /// a session.
    pub fn parse(raw: &str) -> Option<Self> {
        Uuid::parse_str(raw).ok().map(SessionId)
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One traversal bound to its graph.
#[derive(Debug)]
pub struct Session {
    pub id: SessionId,
    pub graph: Arc<Graph>,
    stepper: Stepper,
    /// Gates automatic playback only. Manual steps are always allowed.
    pub paused: bool,
    history: Option<Vec<Event>>,
    steps: u64,
    pub created_at: Instant,
    pub last_active: Instant,
}

impl Session {
    /// Wraps a freshly created stepper. Sessions start paused.
    pub fn new(id: SessionId, graph: Arc<Graph>, stepper: Stepper, trace_events: bool) -> Self {
        let now = Instant::now();
        Session {
            id,
            graph,
            stepper,
            paused: true,
            history: trace_events.then(Vec::new),
            steps: 0,
            created_at: now,
            last_active: now,
        }
    }

    pub fn algorithm(&self) -> &str {
        self.stepper.algorithm()
    }

    pub fn start(&self) -> &NodeId {
        self.stepper.start()
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    /// Events emitted so far. Always empty when tracing is disabled.
    pub fn history(&self) -> &[Event] {
        self.history.as_deref().unwrap_or(&[])
    }

    pub fn is_tracing(&self) -> bool {
        self.history.is_some()
    }

    /// Number of advances that produced an event.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_exhausted(&self) -> bool {
        self.stepper.is_exhausted()
    }

    /// Advances the stepper by one event.
    pub fn advance(&mut self) -> Advance {
        self.last_active = Instant::now();
        let advance = Runner::advance(&mut self.stepper);
        if let Advance::Event(event) = &advance {
            self.steps += 1;
            tracing::debug!(session = %self.id, step = self.steps, kind = %event.kind(), "advance");
            if let Some(history) = &mut self.history {
                history.push(event.clone());
            }
        }
        advance
    }

    pub fn touch(&mut self) {
        self.last_active = Instant::now();
    }
}

pub type SharedSession = Arc<tokio::sync::Mutex<Session>>;

/// Registry of live sessions.
pub struct SessionStore {
    sessions: DashMap<SessionId, SharedSession>,
}

impl SessionStore {
    pub fn new() -> Self {
        SessionStore {
            sessions: DashMap::new(),
        }
    }

    /// Stores `session` under its own id, replacing any previous entry.
    pub fn put(&self, session: Session) -> SessionId {
        let id = session.id;
        self.sessions
            .insert(id, Arc::new(tokio::sync::Mutex::new(session)));
        id
    }

    pub fn get(&self, id: &SessionId) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| Arc::clone(entry.value()))
    }

    /// Removes a session. Returns `true` if it existed. An advance already
    /// holding the session finishes on its own copy of the handle.
    pub fn remove(&self, id: &SessionId) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Handles to every live session.
    pub fn list(&self) -> Vec<SharedSession> {
        self.sessions
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Removes sessions idle for longer than `timeout`. A session that is
    /// currently locked is in use and always kept.
    ///
    /// Returns the number of sessions removed.
    pub fn sweep_inactive(&self, timeout: Duration) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.sessions.retain(|_, session| {
            let active = match session.try_lock() {
                Ok(guard) => now.duration_since(guard.last_active) < timeout,
                Err(_) => true,
            };
            if !active {
                removed += 1;
            }
            active
        });
        removed
    }

    /// Spawns a background task that sweeps idle sessions every `interval`.
    pub fn start_expiry_sweep(self: &Arc<Self>, ttl: Duration, interval: Duration) {
        let store = Arc::clone(self);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            loop {
                tick.tick().await;
                let removed = store.sweep_inactive(ttl);
                if removed > 0 {
                    tracing::info!("Swept {} idle session(s)", removed);
                }
            }
        });
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(trace: bool) -> Session {
        let mut g = Graph::new(false, false);
        g.add_edge("A", "B", None);
        let graph = Arc::new(g);
        let stepper = Runner::new()
            .create("bfs", Arc::clone(&graph), "A".into())
            .unwrap();
        Session::new(SessionId::new(), graph, stepper, trace)
    }

    #[test]
    fn new_sessions_are_paused_and_fresh() {
        let s = session(true);
        assert!(s.paused);
        assert_eq!(s.steps(), 0);
        assert!(!s.is_exhausted());
        assert_eq!(s.algorithm(), "bfs");
        assert_eq!(s.start().as_str(), "A");
    }

    #[test]
    fn advance_counts_and_records_events() {
        let mut s = session(true);
        let mut events = 0;
        while let Advance::Event(_) = s.advance() {
            events += 1;
        }
        assert_eq!(s.steps(), events);
        assert_eq!(s.history().len() as u64, events);
        // End markers are neither counted nor recorded.
        assert_eq!(s.advance(), Advance::End);
        assert_eq!(s.steps(), events);
        assert!(s.is_exhausted());
    }

    #[test]
    fn tracing_can_be_disabled() {
        let mut s = session(false);
        s.advance();
        s.advance();
        assert!(!s.is_tracing());
        assert!(s.history().is_empty());
        assert_eq!(s.steps(), 2);
    }

    #[test]
    fn session_id_parsing() {
        let id = SessionId::new();
        assert_eq!(SessionId::parse(&id.to_string()), Some(id));
        assert_eq!(SessionId::parse("not-a-session"), None);
    }

    #[test]
    fn store_put_get_remove() {
        let store = SessionStore::new();
        let id = store.put(session(true));
        assert_eq!(store.len(), 1);
        assert!(store.get(&id).is_some());
        assert!(store.remove(&id));
        assert!(!store.remove(&id));
        assert!(store.get(&id).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn sweep_removes_only_idle_sessions() {
        let store = SessionStore::new();
        let mut idle = session(true);
        idle.last_active = Instant::now() - Duration::from_secs(120);
        let idle_id = store.put(idle);
        let fresh_id = store.put(session(true));

        assert_eq!(store.sweep_inactive(Duration::from_secs(60)), 1);
        assert!(store.get(&idle_id).is_none());
        assert!(store.get(&fresh_id).is_some());
    }

    #[tokio::test]
    async fn sessions_advance_independently() {
        let store = SessionStore::new();
        let a = store.put(session(true));
        let b = store.put(session(true));

        let handle_a = store.get(&a).unwrap();
        let handle_b = store.get(&b).unwrap();
        for _ in 0..5 {
            handle_a.lock().await.advance();
        }
        assert_eq!(handle_a.lock().await.steps(), 5);
        assert_eq!(handle_b.lock().await.steps(), 0);
    }
}

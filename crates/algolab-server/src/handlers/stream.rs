//! SSE playback handler.
//!
//! `GET /sessions/{id}/play` clears the session's pause flag and streams one
//! advance per interval as Server-Sent Events. Each SSE event is named after
//! the step kind and carries the same JSON as `POST /sessions/{id}/step`.
//! The stream ends after the end marker, or as soon as the session is paused.

use std::convert::Infallible;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{self, Stream};

use algolab_engine::Advance;

use super::find_session;
use crate::error::ApiError;
use crate::schema::sessions::PlayParams;
use crate::session::{SessionId, SharedSession};
use crate::state::AppState;

struct Playback {
    id: SessionId,
    session: SharedSession,
    interval: Duration,
    first: bool,
    done: bool,
}

/// `GET /sessions/{id}/play?interval_ms=N`
pub async fn play_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<PlayParams>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let (id, session) = find_session(&state, &id)?;
    let interval = params
        .interval_ms
        .map(Duration::from_millis)
        .unwrap_or(state.config.play_interval);
    {
        let mut guard = session.lock().await;
        guard.paused = false;
        guard.touch();
    }
    tracing::info!(session = %id, interval_ms = interval.as_millis() as u64, "playback started");

    let playback = Playback {
        id,
        session,
        interval,
        first: true,
        done: false,
    };
    let events = stream::unfold(playback, |mut pb| async move {
        if pb.done {
            return None;
        }
        if !pb.first {
            tokio::time::sleep(pb.interval).await;
        }
        pb.first = false;

        let advance = {
            let mut session = pb.session.lock().await;
            if session.paused {
                tracing::info!(session = %pb.id, "playback paused");
                return None;
            }
            let advance = session.advance();
            if advance.is_end() {
                session.paused = true;
            }
            advance
        };
        pb.done = advance.is_end();
        Some((Ok(sse_event(&advance)), pb))
    });

    Ok(Sse::new(events).keep_alive(KeepAlive::default()))
}

fn sse_event(advance: &Advance) -> Event {
    let name = match advance {
        Advance::Event(event) => event.kind().as_str(),
        Advance::End => "end",
    };
    let data = serde_json::to_string(advance).unwrap_or_else(|_| "{}".to_string());
    Event::default().event(name).data(data)
}

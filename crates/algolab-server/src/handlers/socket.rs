//! WebSocket push channel.
//!
//! `GET /ws/sessions/{id}` upgrades to a socket that advances the session on
//! demand. Every text frame is a trigger: `play` and `pause` toggle timed
//! auto-advance, anything else performs one step. Each advance is sent back
//! as a JSON text frame. The server closes the socket after the end marker,
//! and immediately (policy violation) when the session does not exist.

use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::response::Response;
use tokio::time::MissedTickBehavior;

use crate::session::{SessionId, SharedSession};
use crate::state::AppState;

/// A client frame, interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Step,
    Play,
    Pause,
}

impl Command {
    pub fn parse(text: &str) -> Self {
        match text.trim() {
            "play" => Command::Play,
            "pause" => Command::Pause,
            _ => Command::Step,
        }
    }
}

enum Trigger {
    Command(Command),
    Tick,
    Ignore,
    Stop,
}

fn classify(id: &SessionId, incoming: Option<Result<Message, axum::Error>>) -> Trigger {
    match incoming {
        None | Some(Ok(Message::Close(_))) => Trigger::Stop,
        Some(Err(err)) => {
            tracing::warn!(session = %id, "socket receive failed: {}", err);
            Trigger::Stop
        }
        Some(Ok(Message::Text(text))) => Trigger::Command(Command::parse(text.as_str())),
        Some(Ok(_)) => Trigger::Ignore,
    }
}

/// `GET /ws/sessions/{id}`
pub async fn session_socket(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Response {
    let found = SessionId::parse(&id).and_then(|sid| state.sessions.get(&sid).map(|s| (sid, s)));
    let interval = state.config.play_interval;

    ws.on_upgrade(move |mut socket| async move {
        match found {
            Some((sid, session)) => drive(socket, sid, session, interval).await,
            None => {
                tracing::warn!(session = %id, "socket opened for unknown session");
                close(&mut socket, close_code::POLICY, "unknown session").await;
            }
        }
    })
}

async fn drive(mut socket: WebSocket, id: SessionId, session: SharedSession, interval: Duration) {
    tracing::info!(session = %id, "socket connected");
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        let playing = !session.lock().await.paused;
        let trigger = tokio::select! {
            incoming = socket.recv() => classify(&id, incoming),
            _ = ticker.tick(), if playing => Trigger::Tick,
        };

        let advance = match trigger {
            Trigger::Stop => break,
            Trigger::Ignore => continue,
            Trigger::Command(Command::Step) => session.lock().await.advance(),
            Trigger::Command(Command::Play) => {
                session.lock().await.paused = false;
                ticker.reset_immediately();
                continue;
            }
            Trigger::Command(Command::Pause) => {
                session.lock().await.paused = true;
                continue;
            }
            Trigger::Tick => {
                let mut guard = session.lock().await;
                if guard.paused {
                    continue;
                }
                guard.advance()
            }
        };

        let payload = match serde_json::to_string(&advance) {
            Ok(payload) => payload,
            Err(err) => {
                tracing::warn!(session = %id, "failed to encode advance: {}", err);
                break;
            }
        };
        if let Err(err) = socket.send(Message::Text(payload.into())).await {
            tracing::warn!(session = %id, "socket send failed: {}", err);
            break;
        }
        if advance.is_end() {
            session.lock().await.paused = true;
            close(&mut socket, close_code::NORMAL, "traversal finished").await;
            break;
        }
    }
    tracing::info!(session = %id, "socket closed");
}

async fn close(socket: &mut WebSocket, code: u16, reason: &'static str) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if let Err(err) = socket.send(Message::Close(Some(frame))).await {
        tracing::debug!("close frame not delivered: {}", err);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_frames_map_to_commands() {
        assert_eq!(Command::parse("play"), Command::Play);
        assert_eq!(Command::parse(" pause\n"), Command::Pause);
        assert_eq!(Command::parse("step"), Command::Step);
        assert_eq!(Command::parse("next please"), Command::Step);
        assert_eq!(Command::parse(""), Command::Step);
    }
}

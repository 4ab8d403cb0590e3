//! HTTP handler modules for the algolab API.
//!
//! Handlers are thin: they resolve the session, lock it, delegate to the
//! engine, and serialize the result.

pub mod health;
pub mod sessions;
pub mod socket;
pub mod stream;

use crate::error::ApiError;
use crate::session::{SessionId, SharedSession};
use crate::state::AppState;

/// Resolves a path segment to a live session.
///
/// Ids that do not parse can never name a session and are reported the same
/// way as ids that are not (or no longer) in the store.
pub(crate) fn find_session(
    state: &AppState,
    raw_id: &str,
) -> Result<(SessionId, SharedSession), ApiError> {
    let id = SessionId::parse(raw_id).ok_or_else(|| ApiError::unknown_session(raw_id))?;
    let session = state
        .sessions
        .get(&id)
        .ok_or_else(|| ApiError::unknown_session(id))?;
    Ok((id, session))
}

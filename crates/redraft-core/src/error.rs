//! Session-level error taxonomy.

use thiserror::Error;

use crate::host::HostError;
use crate::locator::LocateError;
use crate::session::SessionState;

/// Errors surfaced by redraft sessions.
///
/// Every failure is scoped to one unit; the registry itself never errors, so
/// one unit's failure cannot corrupt another's session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedraftError {
    /// An over-length query reached the locator without being chunked.
    ///
    /// Programmer error: session code always goes through the chunked matcher.
    #[error("search query of {len} characters exceeds the host limit of {limit}")]
    QueryTooLong {
        /// Query length in characters.
        len: usize,
        /// The host's maximum query length.
        limit: usize,
    },
    /// Neither the unit's current text nor its original text could be found.
    ///
    /// Recoverable: the session stays in `Reviewing` and the user may edit,
    /// regenerate, or cancel.
    #[error("the unit's text could not be found in the document")]
    ClauseNotFound,
    /// The generation collaborator failed or returned an empty candidate.
    #[error("text generation failed: {0}")]
    GenerationFailed(String),
    /// A generation request for this session is already in flight.
    #[error("a generation request is already in flight for this unit")]
    GenerationInFlight,
    /// The session has no candidate text to act on.
    #[error("no candidate text to act on")]
    NoCandidate,
    /// Candidate text may not be empty; an empty candidate would silently
    /// delete the unit from the document.
    #[error("candidate text must not be empty")]
    EmptyCandidate,
    /// The requested action is only valid while reviewing a candidate.
    #[error("operation requires a reviewing session (state was {0:?})")]
    NotReviewing(SessionState),
    /// The session already ended in a terminal state.
    #[error("session is closed ({0:?})")]
    SessionClosed(SessionState),
    /// No live session exists for the unit key.
    #[error("no live redraft session for unit '{0}'")]
    UnknownUnit(String),
    /// The document host failed with a non-recoverable backend error.
    #[error("document host error: {0}")]
    Host(String),
}

impl From<LocateError> for RedraftError {
    fn from(err: LocateError) -> Self {
        match err {
            LocateError::QueryTooLong { len, limit } => RedraftError::QueryTooLong { len, limit },
            // Stale ranges are folded into NotFound by the replace executor;
            // anything surfacing here is a genuine backend failure.
            LocateError::Host(host) => RedraftError::Host(host.to_string()),
        }
    }
}

impl From<HostError> for RedraftError {
    fn from(err: HostError) -> Self {
        RedraftError::Host(err.to_string())
    }
}

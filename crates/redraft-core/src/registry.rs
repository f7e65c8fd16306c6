//! Aggregate over all units open for redrafting in one analysis view.
//!
//! The registry owns every live [`RedraftSession`] (at most one per unit key)
//! and remembers, for the lifetime of the view, which units have an accepted
//! redraft and what their final text is. It is pure in-memory state: nothing
//! is persisted across document reloads, and the registry itself never fails.
//! Only sessions surface errors, each scoped to its own unit.

use std::collections::HashMap;

use tracing::debug;

use crate::error::RedraftError;
use crate::generate::{GenerateError, GenerationId};
use crate::host::DocumentHost;
use crate::session::{AcceptOutcome, RedraftSession, RedraftableUnit};

/// Maps unit identities to their redraft sessions and accepted results.
#[derive(Debug, Default)]
pub struct RedraftRegistry {
    sessions: HashMap<String, RedraftSession>,
    /// Final accepted text per unit, for units whose session has been folded.
    accepted: HashMap<String, String>,
    /// Original text per unit, recorded the first time a unit is seen, so
    /// `current_text_for` can answer after a session is discarded.
    originals: HashMap<String, String>,
}

impl RedraftRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the live session for `key`, creating one when none exists.
    ///
    /// A fresh session's unit searches for the last accepted text when the
    /// unit was redrafted before, and for `original_text` otherwise. The
    /// original is recorded the first time a key is seen; later calls with a
    /// different `original_text` keep the recorded one, so the unit and
    /// [`current_text_for`](Self::current_text_for) always agree. Terminal
    /// leftovers are replaced, keeping the invariant that at most one
    /// non-terminal session exists per key.
    pub fn get_or_create(&mut self, key: &str, original_text: &str) -> &mut RedraftSession {
        let original = self
            .originals
            .entry(key.to_owned())
            .or_insert_with(|| original_text.to_owned())
            .clone();

        let needs_fresh = self
            .sessions
            .get(key)
            .is_none_or(|session| session.state().is_terminal());
        if needs_fresh {
            let unit = match self.accepted.get(key) {
                Some(current) => RedraftableUnit::resumed(key, original, current.clone()),
                None => RedraftableUnit::new(key, original),
            };
            self.sessions
                .insert(key.to_owned(), RedraftSession::new(unit));
        }
        self.sessions
            .get_mut(key)
            .expect("session inserted or already present")
    }

    /// The live session for `key`, if any.
    pub fn session(&self, key: &str) -> Option<&RedraftSession> {
        self.sessions.get(key)
    }

    /// Mutable access to the live session for `key`, if any.
    pub fn session_mut(&mut self, key: &str) -> Option<&mut RedraftSession> {
        self.sessions.get_mut(key)
    }

    /// Deliver a generation result to the session for `key`.
    ///
    /// Returns `false` when the result was dropped: the session was discarded
    /// (the user navigated away) or the id is stale.
    pub fn resolve_generation(
        &mut self,
        key: &str,
        id: GenerationId,
        result: Result<String, GenerateError>,
    ) -> bool {
        match self.sessions.get_mut(key) {
            Some(session) => session.resolve_generation(id, result),
            None => {
                debug!(unit = key, "dropping generation result for a discarded session");
                false
            }
        }
    }

    /// Accept the candidate for `key`, apply it to the document, and fold the
    /// session.
    ///
    /// On success the final text is recorded and the session removed. On
    /// failure the session stays live (still `Reviewing` for
    /// [`RedraftError::ClauseNotFound`]) so the user can retry.
    pub fn accept<H: DocumentHost>(
        &mut self,
        key: &str,
        host: &mut H,
    ) -> Result<AcceptOutcome, RedraftError> {
        let session = self
            .sessions
            .get_mut(key)
            .ok_or_else(|| RedraftError::UnknownUnit(key.to_owned()))?;
        let outcome = session.accept(host)?;
        let final_text = session.unit().current_text().to_owned();
        self.sessions.remove(key);
        self.accepted.insert(key.to_owned(), final_text);
        Ok(outcome)
    }

    /// Reject and discard the session for `key`. The unit is untouched.
    pub fn reject(&mut self, key: &str) {
        if let Some(mut session) = self.sessions.remove(key) {
            // Best effort: a session not in Reviewing is simply dropped.
            let _ = session.reject();
        }
    }

    /// Drop the session for `key` without a decision (the user navigated
    /// away). Any in-flight generation result for it will be ignored on
    /// arrival.
    pub fn discard(&mut self, key: &str) -> bool {
        self.sessions.remove(key).is_some()
    }

    /// Record an accepted redraft applied outside the registry (an embedder
    /// driving a session directly), discarding any live session for the key.
    pub fn mark_accepted(&mut self, key: &str, final_text: &str) {
        self.sessions.remove(key);
        self.accepted.insert(key.to_owned(), final_text.to_owned());
    }

    /// Whether `key` has at least one accepted redraft.
    pub fn is_accepted(&self, key: &str) -> bool {
        self.accepted.contains_key(key)
    }

    /// The text to search for on the unit's next redraft: its original text
    /// until a redraft is accepted, then the last accepted text.
    ///
    /// `None` for keys the registry has never seen.
    pub fn current_text_for(&self, key: &str) -> Option<&str> {
        if let Some(session) = self.sessions.get(key) {
            return Some(session.unit().current_text());
        }
        if let Some(text) = self.accepted.get(key) {
            return Some(text);
        }
        self.originals.get(key).map(String::as_str)
    }

    /// Keys with an accepted redraft, for UI partitioning. Unordered.
    pub fn accepted_keys(&self) -> impl Iterator<Item = &str> {
        self.accepted.keys().map(String::as_str)
    }

    /// Number of live (non-folded) sessions.
    pub fn live_sessions(&self) -> usize {
        self.sessions.len()
    }
}

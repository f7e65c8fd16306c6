//! Redraft lifecycle state machine.
//!
//! A [`RedraftSession`] owns one unit's journey through a redraft:
//!
//! ```text
//!            begin_generation            resolve Ok
//!   Idle ──────────────────► Generating ────────────► Reviewing
//!    ▲                           │                     │  │  │
//!    └───────────────────────────┘                     │  │  └── reject ──► Rejected
//!        resolve Err / empty            regenerate ◄───┘  └───── accept ──► Accepted
//! ```
//!
//! The session tracks the unit's *current* text separately from its original:
//! after a first accepted redraft the original no longer exists in the
//! document, so the next locate must use the last accepted text. Acceptance
//! carries the one fallback the engine allows: if the current text cannot be
//! found and differs from the original, the original is tried once before
//! giving up with [`RedraftError::ClauseNotFound`].

use tracing::{debug, warn};

use crate::error::RedraftError;
use crate::generate::{GenerateError, GenerationContext, GenerationId, GenerationRequest, TextGenerator};
use crate::host::DocumentHost;
use crate::replace::{ReplaceExecutor, ReplaceOutcome};

/// Lifecycle state of a redraft session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No candidate yet; a generation may be started.
    Idle,
    /// A generation request is in flight.
    Generating,
    /// A candidate is being reviewed; it may be edited, accepted, rejected, or
    /// regenerated.
    Reviewing,
    /// The candidate was applied to the document. Terminal.
    Accepted,
    /// The candidate was discarded without applying. Terminal.
    Rejected,
}

impl SessionState {
    /// Whether the session has ended and should be discarded.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Accepted | SessionState::Rejected)
    }
}

/// How an acceptance found its target in the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    /// The unit's current text was located and replaced.
    Replaced,
    /// The current text was absent but the original text was found and
    /// replaced (stale current-text tracking on a repeat redraft).
    ReplacedViaOriginal,
}

/// One logical unit of redraftable text: a clause, a comment's anchored text,
/// or a user selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedraftableUnit {
    key: String,
    original_text: String,
    current_text: String,
    accepted: bool,
}

impl RedraftableUnit {
    /// Create a unit that has never been redrafted; its current text equals
    /// its original text.
    pub fn new(key: impl Into<String>, original_text: impl Into<String>) -> Self {
        let original_text = original_text.into();
        Self {
            key: key.into(),
            current_text: original_text.clone(),
            original_text,
            accepted: false,
        }
    }

    /// Rebuild a unit that already has an accepted redraft in the document.
    pub(crate) fn resumed(
        key: impl Into<String>,
        original_text: impl Into<String>,
        current_text: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            original_text: original_text.into(),
            current_text: current_text.into(),
            accepted: true,
        }
    }

    /// Stable identity of the unit.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The text as first presented to the user. Immutable for the unit's
    /// lifetime.
    pub fn original_text(&self) -> &str {
        &self.original_text
    }

    /// The text currently believed to exist in the document for this unit.
    ///
    /// This is always the correct value to search for on the next redraft
    /// attempt; once [`accepted`](Self::accepted) is true the original text is
    /// no longer in the document.
    pub fn current_text(&self) -> &str {
        &self.current_text
    }

    /// Whether at least one redraft has been applied.
    pub fn accepted(&self) -> bool {
        self.accepted
    }
}

/// State machine for one unit's redraft lifecycle.
#[derive(Debug)]
pub struct RedraftSession {
    unit: RedraftableUnit,
    state: SessionState,
    candidate_text: Option<String>,
    instructions: String,
    last_error: Option<RedraftError>,
    pending_generation: Option<GenerationId>,
    next_generation_id: u64,
    surrounding_text: Option<String>,
    prior_replies: Vec<String>,
}

impl RedraftSession {
    /// Create an idle session for `unit`.
    pub fn new(unit: RedraftableUnit) -> Self {
        Self {
            unit,
            state: SessionState::Idle,
            candidate_text: None,
            instructions: String::new(),
            last_error: None,
            pending_generation: None,
            next_generation_id: 0,
            surrounding_text: None,
            prior_replies: Vec::new(),
        }
    }

    /// The unit this session redrafts.
    pub fn unit(&self) -> &RedraftableUnit {
        &self.unit
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The candidate under review, if any.
    pub fn candidate_text(&self) -> Option<&str> {
        self.candidate_text.as_deref()
    }

    /// The instructions last forwarded to the generator.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// The most recent failure, cleared on the next successful transition.
    pub fn last_error(&self) -> Option<&RedraftError> {
        self.last_error.as_ref()
    }

    /// Provide nearby document text to ground future generation requests.
    pub fn set_surrounding_text(&mut self, text: Option<String>) {
        self.surrounding_text = text;
    }

    /// Start generating a candidate with the given instructions.
    ///
    /// Valid from `Idle` and `Reviewing`; a prior candidate is pushed into the
    /// request's `prior_replies`. Returns the request the embedder must
    /// fulfill and feed back via [`resolve_generation`](Self::resolve_generation).
    /// At most one generation is in flight per session: a second call while
    /// `Generating` fails with [`RedraftError::GenerationInFlight`].
    pub fn begin_generation(
        &mut self,
        instructions: impl Into<String>,
    ) -> Result<GenerationRequest, RedraftError> {
        match self.state {
            SessionState::Generating => return Err(RedraftError::GenerationInFlight),
            SessionState::Accepted | SessionState::Rejected => {
                return Err(RedraftError::SessionClosed(self.state));
            }
            SessionState::Idle | SessionState::Reviewing => {}
        }

        self.instructions = instructions.into();
        if let Some(previous) = self.candidate_text.take() {
            self.prior_replies.push(previous);
        }
        self.last_error = None;
        self.state = SessionState::Generating;

        let id = GenerationId::new(self.next_generation_id);
        self.next_generation_id += 1;
        self.pending_generation = Some(id);

        Ok(GenerationRequest {
            id,
            context: GenerationContext {
                current_text: self.unit.current_text.clone(),
                instructions: self.instructions.clone(),
                surrounding_text: self.surrounding_text.clone(),
                prior_replies: self.prior_replies.clone(),
            },
        })
    }

    /// Deliver the outcome of a generation request.
    ///
    /// Returns `false` when the result was dropped because `id` is not the
    /// pending request, a late arrival after regeneration or abandonment.
    /// On success the session moves to `Reviewing`; on failure (including an
    /// empty candidate) it returns to `Idle` with
    /// [`RedraftError::GenerationFailed`] recorded for the UI to offer a retry.
    pub fn resolve_generation(
        &mut self,
        id: GenerationId,
        result: Result<String, GenerateError>,
    ) -> bool {
        if self.pending_generation != Some(id) {
            warn!(unit = %self.unit.key, "dropping generation result for a stale request");
            return false;
        }
        self.pending_generation = None;

        let result = result.and_then(|text| {
            if text.trim().is_empty() {
                Err(GenerateError::EmptyCandidate)
            } else {
                Ok(text)
            }
        });
        match result {
            Ok(text) => {
                self.candidate_text = Some(text);
                self.state = SessionState::Reviewing;
                self.last_error = None;
            }
            Err(err) => {
                debug!(unit = %self.unit.key, %err, "generation failed");
                self.state = SessionState::Idle;
                self.last_error = Some(RedraftError::GenerationFailed(err.to_string()));
            }
        }
        true
    }

    /// Run a full generation cycle against a synchronous collaborator.
    pub fn generate_with(
        &mut self,
        generator: &mut dyn TextGenerator,
        instructions: impl Into<String>,
    ) -> Result<(), RedraftError> {
        let request = self.begin_generation(instructions)?;
        let result = generator.generate(&request.context);
        self.resolve_generation(request.id, result);
        match &self.last_error {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Replace the candidate with user-edited text before acceptance.
    pub fn edit_candidate(&mut self, text: impl Into<String>) -> Result<(), RedraftError> {
        if self.state != SessionState::Reviewing {
            return Err(RedraftError::NotReviewing(self.state));
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RedraftError::EmptyCandidate);
        }
        self.candidate_text = Some(text);
        Ok(())
    }

    /// Apply the candidate to the document.
    ///
    /// Locates the unit's current text (chunked when over the host limit) and
    /// substitutes the candidate as one uninterruptible locate-and-replace. If
    /// the current text is absent and this is a second-or-later redraft, the
    /// original text is retried once. On success the unit's current text
    /// becomes the candidate, the unit is marked accepted, and the session
    /// ends in `Accepted`. On [`RedraftError::ClauseNotFound`] the session
    /// stays in `Reviewing` with the candidate untouched so the user can edit,
    /// regenerate, or cancel.
    pub fn accept<H: DocumentHost>(&mut self, host: &mut H) -> Result<AcceptOutcome, RedraftError> {
        if self.state != SessionState::Reviewing {
            return Err(RedraftError::NotReviewing(self.state));
        }
        let candidate = self
            .candidate_text
            .clone()
            .ok_or(RedraftError::NoCandidate)?;

        let mut executor = ReplaceExecutor::new(host);
        let outcome = match executor.locate_and_replace(&self.unit.current_text, &candidate)? {
            ReplaceOutcome::Replaced => AcceptOutcome::Replaced,
            ReplaceOutcome::NotFound => {
                if self.unit.current_text == self.unit.original_text {
                    self.last_error = Some(RedraftError::ClauseNotFound);
                    return Err(RedraftError::ClauseNotFound);
                }
                // Current-text tracking can go stale on repeat redrafts; the
                // original text is the one other value worth trying.
                debug!(unit = %self.unit.key, "current text not found; retrying with original text");
                match executor.locate_and_replace(&self.unit.original_text, &candidate)? {
                    ReplaceOutcome::Replaced => AcceptOutcome::ReplacedViaOriginal,
                    ReplaceOutcome::NotFound => {
                        self.last_error = Some(RedraftError::ClauseNotFound);
                        return Err(RedraftError::ClauseNotFound);
                    }
                }
            }
        };

        self.unit.current_text = candidate;
        self.unit.accepted = true;
        self.state = SessionState::Accepted;
        self.last_error = None;
        Ok(outcome)
    }

    /// Discard the candidate and end the session without touching the unit.
    pub fn reject(&mut self) -> Result<(), RedraftError> {
        if self.state != SessionState::Reviewing {
            return Err(RedraftError::NotReviewing(self.state));
        }
        self.state = SessionState::Rejected;
        Ok(())
    }

    /// Drop the current candidate and start a fresh generation.
    ///
    /// `instructions` of `None` reuses the previous instructions.
    pub fn regenerate(
        &mut self,
        instructions: Option<String>,
    ) -> Result<GenerationRequest, RedraftError> {
        if self.state != SessionState::Reviewing {
            return Err(RedraftError::NotReviewing(self.state));
        }
        let instructions = instructions.unwrap_or_else(|| self.instructions.clone());
        self.begin_generation(instructions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{CannedGenerator, ScriptedHost};
    use pretty_assertions::assert_eq;

    fn reviewing_session(original: &str, candidate: &str) -> RedraftSession {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", original));
        let request = session.begin_generation("tighten wording").unwrap();
        assert!(session.resolve_generation(request.id, Ok(candidate.to_string())));
        assert_eq!(session.state(), SessionState::Reviewing);
        session
    }

    #[test]
    fn test_generation_round_trip() {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "old text"));
        assert_eq!(session.state(), SessionState::Idle);

        let request = session.begin_generation("shorter").unwrap();
        assert_eq!(session.state(), SessionState::Generating);
        assert_eq!(request.context.current_text, "old text");
        assert_eq!(request.context.instructions, "shorter");

        assert!(session.resolve_generation(request.id, Ok("new text".into())));
        assert_eq!(session.state(), SessionState::Reviewing);
        assert_eq!(session.candidate_text(), Some("new text"));
    }

    #[test]
    fn test_second_generation_while_in_flight_is_rejected() {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "text"));
        session.begin_generation("a").unwrap();

        let err = session.begin_generation("b").unwrap_err();
        assert_eq!(err, RedraftError::GenerationInFlight);
    }

    #[test]
    fn test_stale_generation_result_is_dropped() {
        let mut session = reviewing_session("text", "draft one");
        let stale = session.regenerate(None).unwrap();
        let fresh = {
            // Simulate abandonment of the first regenerate: resolve it with an
            // error, then start again.
            assert!(session.resolve_generation(stale.id, Err(GenerateError::Service("timeout".into()))));
            session.begin_generation("again").unwrap()
        };

        // The first request's id no longer matches the pending one.
        assert!(!session.resolve_generation(stale.id, Ok("late arrival".into())));
        assert_eq!(session.state(), SessionState::Generating);

        assert!(session.resolve_generation(fresh.id, Ok("draft two".into())));
        assert_eq!(session.candidate_text(), Some("draft two"));
    }

    #[test]
    fn test_generation_failure_returns_to_idle_with_error() {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "text"));
        let request = session.begin_generation("go").unwrap();

        session.resolve_generation(request.id, Err(GenerateError::Service("http 500".into())));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(
            session.last_error(),
            Some(RedraftError::GenerationFailed(_))
        ));

        // Retry is allowed from Idle.
        assert!(session.begin_generation("go again").is_ok());
    }

    #[test]
    fn test_empty_candidate_is_rejected_at_the_boundary() {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "text"));
        let request = session.begin_generation("go").unwrap();

        session.resolve_generation(request.id, Ok("   \n".into()));
        assert_eq!(session.state(), SessionState::Idle);
        assert!(matches!(
            session.last_error(),
            Some(RedraftError::GenerationFailed(_))
        ));
    }

    #[test]
    fn test_edit_candidate_becomes_final() {
        let mut session = reviewing_session("Party shall pay within 30 days.", "draft");
        session.edit_candidate("hand-tuned draft").unwrap();
        assert_eq!(session.candidate_text(), Some("hand-tuned draft"));

        let err = session.edit_candidate("  ").unwrap_err();
        assert_eq!(err, RedraftError::EmptyCandidate);
        assert_eq!(session.candidate_text(), Some("hand-tuned draft"));
    }

    #[test]
    fn test_accept_replaces_and_updates_current_text() {
        let mut host = ScriptedHost::new("Intro. Party shall pay within 30 days. Outro.");
        let mut session = reviewing_session(
            "Party shall pay within 30 days.",
            "Party shall pay within 15 business days.",
        );

        let outcome = session.accept(&mut host).unwrap();
        assert_eq!(outcome, AcceptOutcome::Replaced);
        assert_eq!(
            host.text(),
            "Intro. Party shall pay within 15 business days. Outro."
        );
        assert_eq!(session.state(), SessionState::Accepted);
        assert!(session.unit().accepted());
        assert_eq!(
            session.unit().current_text(),
            "Party shall pay within 15 business days."
        );
        assert_eq!(
            session.unit().original_text(),
            "Party shall pay within 30 days."
        );
    }

    #[test]
    fn test_accept_not_found_stays_reviewing() {
        let mut host = ScriptedHost::new("a document without the clause");
        let mut session = reviewing_session("missing clause", "replacement");

        let err = session.accept(&mut host).unwrap_err();
        assert_eq!(err, RedraftError::ClauseNotFound);
        assert_eq!(session.state(), SessionState::Reviewing);
        assert_eq!(session.candidate_text(), Some("replacement"));
        assert_eq!(session.last_error(), Some(&RedraftError::ClauseNotFound));
        assert_eq!(host.text(), "a document without the clause");
    }

    #[test]
    fn test_accept_falls_back_to_original_text() {
        // The document still holds the original, but the unit tracks a stale
        // "current" text from an earlier session.
        let mut host = ScriptedHost::new("Seller warrants the goods for one year.");
        let unit = RedraftableUnit::resumed(
            "u1",
            "Seller warrants the goods for one year.",
            "a current text that is not in the document",
        );
        let mut session = RedraftSession::new(unit);
        let request = session.begin_generation("two years").unwrap();
        session.resolve_generation(request.id, Ok("Seller warrants the goods for two years.".into()));

        let outcome = session.accept(&mut host).unwrap();
        assert_eq!(outcome, AcceptOutcome::ReplacedViaOriginal);
        assert_eq!(host.text(), "Seller warrants the goods for two years.");
        assert_eq!(
            session.unit().current_text(),
            "Seller warrants the goods for two years."
        );
    }

    #[test]
    fn test_accept_without_fallback_when_never_accepted() {
        let mut host = ScriptedHost::new("unrelated");
        let mut session = reviewing_session("absent clause", "candidate");

        assert_eq!(session.accept(&mut host).unwrap_err(), RedraftError::ClauseNotFound);
        // Only one locate attempt: current == original, so no retry.
        assert_eq!(host.search_calls(), 1);
    }

    #[test]
    fn test_reject_is_terminal_and_leaves_unit_untouched() {
        let mut session = reviewing_session("clause", "candidate");
        session.reject().unwrap();
        assert_eq!(session.state(), SessionState::Rejected);
        assert!(!session.unit().accepted());
        assert_eq!(session.unit().current_text(), "clause");

        assert!(matches!(
            session.begin_generation("more"),
            Err(RedraftError::SessionClosed(SessionState::Rejected))
        ));
    }

    #[test]
    fn test_regenerate_carries_prior_candidate() {
        let mut session = reviewing_session("clause", "first draft");
        let request = session.regenerate(Some("more formal".into())).unwrap();

        assert_eq!(session.state(), SessionState::Generating);
        assert_eq!(session.candidate_text(), None);
        assert_eq!(request.context.prior_replies, vec!["first draft".to_string()]);
        assert_eq!(request.context.instructions, "more formal");
    }

    #[test]
    fn test_generate_with_synchronous_collaborator() {
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "clause"));
        let mut generator = CannedGenerator::new("generated draft");

        session.generate_with(&mut generator, "please").unwrap();
        assert_eq!(session.state(), SessionState::Reviewing);
        assert_eq!(session.candidate_text(), Some("generated draft"));
    }

    #[test]
    fn test_accept_requires_reviewing() {
        let mut host = ScriptedHost::new("doc");
        let mut session = RedraftSession::new(RedraftableUnit::new("u1", "doc"));

        assert!(matches!(
            session.accept(&mut host),
            Err(RedraftError::NotReviewing(SessionState::Idle))
        ));
    }
}

//! Text-generation collaborator seam.
//!
//! Candidate redrafts come from an external generation service. The engine
//! stays runtime-agnostic: a session hands out a [`GenerationRequest`] carrying
//! everything the service needs, the embedder performs the call however it
//! likes (async task, worker thread, blocking RPC), and feeds the outcome back
//! through `resolve_generation` with the request's id. Results arriving for a
//! stale id are dropped; a stale id means the user regenerated or abandoned
//! the session in the meantime.
//!
//! Embedders with a synchronous service can skip the request/resolve dance via
//! the [`TextGenerator`] trait and
//! [`RedraftSession::generate_with`](crate::RedraftSession::generate_with).

use thiserror::Error;

/// Everything forwarded to the generation service for one request.
///
/// `current_text` is the unit's live text (not necessarily its original; see
/// [`RedraftableUnit`](crate::RedraftableUnit)); `prior_replies` carries
/// earlier candidates for the same unit so regeneration can steer away from
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    /// The text currently believed to exist in the document for the unit.
    pub current_text: String,
    /// Free-form user guidance for the redraft.
    pub instructions: String,
    /// Nearby document text for grounding, when the embedder has it.
    pub surrounding_text: Option<String>,
    /// Candidates produced earlier in this session, oldest first.
    pub prior_replies: Vec<String>,
}

/// Identifies one in-flight generation request within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationId(u64);

impl GenerationId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }
}

/// A generation request minted by a session, to be fulfilled by the embedder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Ticket to pass back to `resolve_generation`.
    pub id: GenerationId,
    /// Payload for the generation service.
    pub context: GenerationContext,
}

/// Failures of the generation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The service errored (network, quota, backend failure).
    #[error("text generation service failed: {0}")]
    Service(String),
    /// The service answered with no usable text.
    ///
    /// Malformed responses are rejected here, at the boundary, so an empty or
    /// whitespace-only candidate can never reach a document mutation.
    #[error("text generation service returned an empty candidate")]
    EmptyCandidate,
}

/// A synchronous generation collaborator.
///
/// Convenience seam for embedders (and tests) whose service call is already
/// blocking; async embedders drive the request/resolve flow directly instead.
pub trait TextGenerator {
    /// Produce candidate text for `context`.
    fn generate(&mut self, context: &GenerationContext) -> Result<String, GenerateError>;
}

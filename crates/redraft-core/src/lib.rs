#![warn(missing_docs)]
//! Redraft Core - Headless Locate-and-Replace Engine for AI Document Assistants
//!
//! # Overview
//!
//! `redraft-core` is the headless kernel of a document AI-assist taskpane: given text that
//! previously existed somewhere in a live document (a clause, a comment's anchored text, a user
//! selection), it finds the text's current location and substitutes AI-generated replacement
//! text, even though the host document's search primitive only accepts literal queries up to a
//! fixed length (255 characters on Word). Coupled to the locator is the redraft
//! lifecycle: per-unit state machines that track what a unit's *current* text is across repeated
//! redraft cycles, since after a first accepted replacement the original text no longer exists in
//! the document.
//!
//! The crate renders no UI and talks to no service directly. The hosting editor is reached
//! through the [`DocumentHost`] trait and the text-generation service through the sans-IO
//! request/resolve flow (or the synchronous [`TextGenerator`] seam).
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  RedraftRegistry (per-view aggregate)       │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  RedraftSession (lifecycle state machine)   │  ← Generate / review / accept
//! ├─────────────────────────────────────────────┤
//! │  ReplaceExecutor (in-place substitution)    │  ← Mutation
//! ├─────────────────────────────────────────────┤
//! │  ChunkedMatcher (long-query anchoring)      │  ← Length-limit bridging
//! ├─────────────────────────────────────────────┤
//! │  DocumentLocator (limit-checked search)     │  ← Host seam
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use redraft_core::{
//!     DocumentHost, GenerateError, GenerationContext, HostError, RedraftRegistry, TextGenerator,
//! };
//!
//! // A toy host: literal search over a string, ranges as (start, len) char spans.
//! struct Doc(String);
//! impl DocumentHost for Doc {
//!     type Range = (usize, usize);
//!     fn search(&mut self, query: &str) -> Result<Vec<(usize, usize)>, HostError> {
//!         Ok(self
//!             .0
//!             .match_indices(query)
//!             .map(|(at, m)| (at, m.len()))
//!             .collect())
//!     }
//!     fn replace(&mut self, (at, len): (usize, usize), text: &str) -> Result<(), HostError> {
//!         self.0.replace_range(at..at + len, text);
//!         Ok(())
//!     }
//! }
//!
//! struct Fifteen;
//! impl TextGenerator for Fifteen {
//!     fn generate(&mut self, _: &GenerationContext) -> Result<String, GenerateError> {
//!         Ok("Party shall pay within 15 business days.".into())
//!     }
//! }
//!
//! let mut doc = Doc("Party shall pay within 30 days.".into());
//! let mut registry = RedraftRegistry::new();
//!
//! let session = registry.get_or_create("clause-1", "Party shall pay within 30 days.");
//! session.generate_with(&mut Fifteen, "use business days").unwrap();
//! registry.accept("clause-1", &mut doc).unwrap();
//!
//! assert_eq!(doc.0, "Party shall pay within 15 business days.");
//! assert_eq!(
//!     registry.current_text_for("clause-1"),
//!     Some("Party shall pay within 15 business days."),
//! );
//! ```
//!
//! # Module Description
//!
//! - [`host`] - the [`DocumentHost`] collaborator seam and [`HostError`]
//! - [`locator`] - limit-checked wrapper over host search
//! - [`chunker`] - chunk splitting and first-chunk anchoring for long queries
//! - [`replace`] - in-place substitution, chunk-wise for texts past the search limit
//! - [`generate`] - the text-generation collaborator seam
//! - [`session`] - the per-unit redraft lifecycle state machine
//! - [`registry`] - the per-view aggregate over all redraftable units
//!
//! # Concurrency Model
//!
//! One logical actor per document-editing session: every locate→replace runs as a single
//! uninterruptible unit behind an exclusive host borrow, the registry keeps at most one live
//! session per unit, and each session holds at most one in-flight generation request. Generation
//! results arriving for a discarded session or a superseded request id are dropped.

pub mod chunker;
pub mod error;
pub mod generate;
pub mod host;
pub mod locator;
pub mod registry;
pub mod replace;
pub mod session;

#[cfg(test)]
pub(crate) mod test_support;

pub use chunker::{ChunkedMatcher, split_chunks};
pub use error::RedraftError;
pub use generate::{
    GenerateError, GenerationContext, GenerationId, GenerationRequest, TextGenerator,
};
pub use host::{DEFAULT_MAX_QUERY_LEN, DocumentHost, HostError};
pub use locator::{DocumentLocator, LocateError};
pub use registry::RedraftRegistry;
pub use replace::{ReplaceExecutor, ReplaceOutcome};
pub use session::{AcceptOutcome, RedraftSession, RedraftableUnit, SessionState};

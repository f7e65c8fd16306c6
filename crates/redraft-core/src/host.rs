//! Document host seam.
//!
//! The engine never touches document storage directly. Everything it needs from the
//! hosting editor is expressed by the [`DocumentHost`] trait: a literal-text search
//! that is limited to a maximum query length, an atomic in-place replace of a located
//! range, and a cosmetic select/scroll hook. Hosts with richer capabilities (regex
//! search, structural edits) expose only this narrow surface to the engine.
//!
//! Range handles are deliberately opaque (`DocumentHost::Range`) and are only valid
//! until the next document mutation. A fresh handle must be obtained for every
//! locate/replace operation; hosts signal a dead handle with
//! [`HostError::StaleRange`].

use thiserror::Error;

/// Default maximum number of characters a host accepts in a single search query.
///
/// Matches the Word taskpane search primitive, which rejects queries longer than
/// 255 units. Hosts with a different limit override
/// [`DocumentHost::max_query_len`].
pub const DEFAULT_MAX_QUERY_LEN: usize = 255;

/// Errors surfaced by a document host.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The range handle was invalidated by a mutation since it was obtained.
    ///
    /// Callers treat this the same as "not found" and re-locate before retrying.
    #[error("range handle is stale; obtain a fresh match before replacing")]
    StaleRange,
    /// Any other backend failure (I/O, RPC bridge, host API error).
    #[error("document host error: {0}")]
    Backend(String),
}

/// The capabilities the engine requires from the hosting document editor.
///
/// Implementations wrap the real host API (e.g. an Office.js bridge) or an
/// in-memory document for tests. All methods take `&mut self`: hosts that batch
/// document I/O into transactions are free to sync inside each call, and the
/// engine guarantees it never holds a `Range` across a mutation.
pub trait DocumentHost {
    /// Opaque handle to a contiguous span of the document.
    ///
    /// Scoped to one editing transaction: not valid after any mutation completes.
    type Range;

    /// Maximum query length (in characters) accepted by [`search`](Self::search).
    fn max_query_len(&self) -> usize {
        DEFAULT_MAX_QUERY_LEN
    }

    /// Find all literal occurrences of `query`, in document order.
    ///
    /// An empty result is the normal "not found" outcome, not an error. Callers
    /// must not pass queries longer than [`max_query_len`](Self::max_query_len);
    /// the engine enforces this in [`DocumentLocator`](crate::DocumentLocator).
    fn search(&mut self, query: &str) -> Result<Vec<Self::Range>, HostError>;

    /// Atomically replace the content of `range` with `text`.
    ///
    /// Consumes the handle: after a successful replace the range no longer
    /// denotes anything meaningful. Returns [`HostError::StaleRange`] if the
    /// handle was invalidated by an intervening mutation.
    fn replace(&mut self, range: Self::Range, text: &str) -> Result<(), HostError>;

    /// Select/scroll to `range` for user feedback. Cosmetic only; the default
    /// implementation does nothing and hosts may ignore stale handles silently.
    fn select(&mut self, range: &Self::Range) {
        let _ = range;
    }
}

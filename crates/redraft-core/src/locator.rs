//! Length-checked wrapper around the host search primitive.
//!
//! [`DocumentLocator`] is the only component that calls
//! [`DocumentHost::search`] directly. It enforces the host's query-length limit
//! up front: an over-length query is a programmer error at this layer (session
//! code must always go through [`ChunkedMatcher`](crate::ChunkedMatcher), which
//! pre-chunks) and is reported as [`LocateError::QueryTooLong`] rather than
//! being forwarded to the host.

use thiserror::Error;

use crate::host::{DocumentHost, HostError};

/// Errors produced while locating text in the document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LocateError {
    /// The query exceeds the host's maximum search length.
    ///
    /// Reaching this from session code means a caller bypassed the chunked
    /// matcher; "not found" is never reported this way.
    #[error("search query of {len} characters exceeds the host limit of {limit}")]
    QueryTooLong {
        /// Query length in characters.
        len: usize,
        /// The host's maximum query length.
        limit: usize,
    },
    /// The host itself failed.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// Wraps a [`DocumentHost`] search for one locate operation.
///
/// Borrows the host mutably for its lifetime so a locate cannot interleave with
/// another mutation of the same document.
pub struct DocumentLocator<'a, H: DocumentHost> {
    host: &'a mut H,
}

impl<'a, H: DocumentHost> DocumentLocator<'a, H> {
    /// Create a locator over `host`.
    pub fn new(host: &'a mut H) -> Self {
        Self { host }
    }

    /// The host's maximum query length in characters.
    pub fn limit(&self) -> usize {
        self.host.max_query_len()
    }

    /// Find all occurrences of `query`, in document order.
    ///
    /// Returns an empty vector when the text is absent; that is the expected
    /// "not found" outcome. Fails with [`LocateError::QueryTooLong`] before
    /// touching the host if `query` is over the limit.
    pub fn search(&mut self, query: &str) -> Result<Vec<H::Range>, LocateError> {
        let len = query.chars().count();
        let limit = self.limit();
        if len > limit {
            return Err(LocateError::QueryTooLong { len, limit });
        }
        Ok(self.host.search(query)?)
    }
}

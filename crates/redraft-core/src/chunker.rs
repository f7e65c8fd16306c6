//! Chunked matching for queries longer than the host search limit.
//!
//! The host search primitive only accepts literal queries up to a fixed length
//! (255 characters on Word), but the texts this engine relocates, whole
//! clauses and comment anchors, are routinely longer. [`ChunkedMatcher`] bridges
//! the gap: it splits an over-length query into ordered, contiguous chunks and
//! locates the **first chunk only**, treating its first match as the anchor for
//! the whole span.
//!
//! # Anchor guarantee
//!
//! For over-length queries, only the start of the text is verified to exist in
//! the document. The matcher does not check that the remaining chunks follow
//! contiguously: the host's literal search normalizes whitespace and formatting
//! enough that adjacency checks against raw chunk boundaries produce false
//! negatives. A false-positive anchor is possible when the first chunk recurs
//! elsewhere with different trailing content; callers that need stronger
//! verification must do it out of band.

use tracing::debug;

use crate::host::DocumentHost;
use crate::locator::{DocumentLocator, LocateError};

/// Split `query` into ordered, contiguous chunks of at most `limit` characters.
///
/// Chunks are cut on character boundaries; the final chunk may be shorter.
/// Returns a single chunk for queries already within the limit, and nothing for
/// an empty query or a zero limit.
pub fn split_chunks(query: &str, limit: usize) -> Vec<&str> {
    if limit == 0 {
        return Vec::new();
    }
    let mut chunks = Vec::new();
    let mut rest = query;
    while !rest.is_empty() {
        let cut = rest
            .char_indices()
            .nth(limit)
            .map(|(byte, _)| byte)
            .unwrap_or(rest.len());
        let (head, tail) = rest.split_at(cut);
        chunks.push(head);
        rest = tail;
    }
    chunks
}

/// Locates arbitrarily long literal text through a length-limited host search.
pub struct ChunkedMatcher<'a, H: DocumentHost> {
    locator: DocumentLocator<'a, H>,
}

impl<'a, H: DocumentHost> ChunkedMatcher<'a, H> {
    /// Create a matcher over `host`.
    pub fn new(host: &'a mut H) -> Self {
        Self {
            locator: DocumentLocator::new(host),
        }
    }

    /// Locate `query` and return the anchor range for a replacement, or `None`
    /// if the text is absent.
    ///
    /// Queries within the host limit are searched directly and the first exact
    /// match is both the anchor and the full span. Longer queries are anchored
    /// at the first match of their first chunk (see the module docs for the
    /// weaker guarantee this implies). The underlying search primitive is never
    /// called with an over-length string.
    pub fn locate(&mut self, query: &str) -> Result<Option<H::Range>, LocateError> {
        if query.is_empty() {
            return Ok(None);
        }
        let limit = self.locator.limit();
        let len = query.chars().count();
        if len <= limit {
            let mut matches = self.locator.search(query)?;
            if matches.is_empty() {
                return Ok(None);
            }
            return Ok(Some(matches.swap_remove(0)));
        }

        let chunks = split_chunks(query, limit);
        debug!(
            query_chars = len,
            chunks = chunks.len(),
            limit,
            "query exceeds host search limit; anchoring at first chunk"
        );
        let Some(first) = chunks.first() else {
            return Ok(None);
        };
        let mut matches = self.locator.search(first)?;
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(matches.swap_remove(0)))
    }
}

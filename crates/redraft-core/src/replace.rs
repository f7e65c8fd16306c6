//! In-place substitution of a located range.
//!
//! [`ReplaceExecutor`] performs the mutation half of a locate-and-replace: given
//! an anchor range from [`ChunkedMatcher`](crate::ChunkedMatcher), it replaces
//! the range's content atomically and reports the outcome. A range invalidated
//! between locating and replacing (a lost race with another mutation) is folded
//! into [`ReplaceOutcome::NotFound`] so callers handle both cases with one
//! retry path: re-locate with a fresh query.
//!
//! Queries longer than the host search limit take a multi-step path: the
//! trailing chunks of the old text are deleted first (last to first), then the
//! replacement lands at the first chunk's match, so the whole span is rewritten
//! even though no single search ever sees the full query.

use tracing::{debug, warn};

use crate::chunker::{ChunkedMatcher, split_chunks};
use crate::host::{DocumentHost, HostError};
use crate::locator::{DocumentLocator, LocateError};

/// Result of a replace attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceOutcome {
    /// The anchor's content was replaced in place.
    Replaced,
    /// The text was absent, or the anchor went stale before the replace landed.
    NotFound,
}

/// Executes replacements against a [`DocumentHost`].
pub struct ReplaceExecutor<'a, H: DocumentHost> {
    host: &'a mut H,
}

impl<'a, H: DocumentHost> ReplaceExecutor<'a, H> {
    /// Create an executor over `host`.
    pub fn new(host: &'a mut H) -> Self {
        Self { host }
    }

    /// Replace the content of `anchor` with `replacement`.
    ///
    /// The anchor is consumed: it must have been freshly located, and is dead
    /// after this call regardless of outcome. A stale anchor is reported as
    /// [`ReplaceOutcome::NotFound`], not an error; only genuine backend
    /// failures propagate.
    pub fn replace(
        &mut self,
        anchor: H::Range,
        replacement: &str,
    ) -> Result<ReplaceOutcome, HostError> {
        self.host.select(&anchor);
        match self.host.replace(anchor, replacement) {
            Ok(()) => Ok(ReplaceOutcome::Replaced),
            Err(HostError::StaleRange) => {
                warn!("replace lost a race: anchor range went stale before the mutation landed");
                Ok(ReplaceOutcome::NotFound)
            }
            Err(err) => Err(err),
        }
    }

    /// Locate `query` and replace it with `replacement` as one uninterruptible
    /// unit.
    ///
    /// Queries within the host limit are a single locate plus replace. Longer
    /// queries are rewritten chunk-wise: every occurrence of each trailing
    /// chunk is deleted, last chunk first, and the replacement then lands at
    /// the first chunk's first match, removing the whole old span. The anchor
    /// still comes from the first chunk alone (see
    /// [`ChunkedMatcher`] for the weaker location guarantee this implies).
    ///
    /// No other mutation of the same document may interleave between the
    /// locate and the replace; the exclusive host borrow enforces that within
    /// this process.
    pub fn locate_and_replace(
        &mut self,
        query: &str,
        replacement: &str,
    ) -> Result<ReplaceOutcome, LocateError> {
        let limit = self.host.max_query_len();
        if query.chars().count() <= limit {
            let anchor = ChunkedMatcher::new(&mut *self.host).locate(query)?;
            let Some(anchor) = anchor else {
                debug!(query_chars = query.chars().count(), "text to replace not found");
                return Ok(ReplaceOutcome::NotFound);
            };
            return Ok(self.replace(anchor, replacement)?);
        }
        let chunks = split_chunks(query, limit);
        self.replace_chunked(&chunks, replacement)
    }

    /// Long-text path: delete the trailing chunks, then replace at the first
    /// chunk's match.
    fn replace_chunked(
        &mut self,
        chunks: &[&str],
        replacement: &str,
    ) -> Result<ReplaceOutcome, LocateError> {
        let Some((first, rest)) = chunks.split_first() else {
            return Ok(ReplaceOutcome::NotFound);
        };
        // Nothing is mutated unless the start of the old text is present.
        if DocumentLocator::new(&mut *self.host).search(first)?.is_empty() {
            debug!(chunks = chunks.len(), "first chunk of long text not found");
            return Ok(ReplaceOutcome::NotFound);
        }
        debug!(
            chunks = chunks.len(),
            "rewriting long text chunk-wise: deleting trailing chunks, then replacing at the first chunk"
        );
        for chunk in rest.iter().rev() {
            self.delete_occurrences(chunk)?;
        }
        let mut matches = DocumentLocator::new(&mut *self.host).search(first)?;
        if matches.is_empty() {
            // A trailing chunk recurred inside the span's start and its
            // deletion consumed the anchor text. The deletions stand; the
            // caller sees a lost race and can re-locate with fresh text.
            warn!("first chunk vanished while trailing chunks were deleted");
            return Ok(ReplaceOutcome::NotFound);
        }
        Ok(self.replace(matches.swap_remove(0), replacement)?)
    }

    /// Delete every occurrence of `chunk`, re-searching after each mutation so
    /// no range handle outlives the mutation that staled it.
    fn delete_occurrences(&mut self, chunk: &str) -> Result<(), LocateError> {
        loop {
            let mut matches = DocumentLocator::new(&mut *self.host).search(chunk)?;
            if matches.is_empty() {
                return Ok(());
            }
            match self.host.replace(matches.swap_remove(0), "") {
                Ok(()) => {}
                // Freshly searched, so a stale handle means an interleaved
                // mutation; re-search and keep going.
                Err(HostError::StaleRange) => {}
                Err(err) => return Err(err.into()),
            }
        }
    }
}

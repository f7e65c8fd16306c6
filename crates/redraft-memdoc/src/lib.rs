#![warn(missing_docs)]
//! In-memory [`DocumentHost`] for `redraft-core`.
//!
//! [`MemDocument`] backs the engine with a plain `String`: literal search over character
//! offsets, atomic range replacement, and a recorded selection standing in for the host's
//! scroll-to-range feedback. Range handles are stamped with the document revision at which
//! they were minted and go stale on any mutation, the same transaction-scoped validity the
//! real host enforces. That makes this crate a faithful test double as well as a reference
//! implementation for embedders writing their own host bridge.
//!
//! # Example
//!
//! ```rust
//! use redraft_core::{ReplaceExecutor, ReplaceOutcome};
//! use redraft_memdoc::MemDocument;
//!
//! let mut doc = MemDocument::new("Party shall pay within 30 days.");
//! let outcome = ReplaceExecutor::new(&mut doc)
//!     .locate_and_replace("30 days", "15 business days")
//!     .unwrap();
//!
//! assert_eq!(outcome, ReplaceOutcome::Replaced);
//! assert_eq!(doc.text(), "Party shall pay within 15 business days.");
//! ```

use redraft_core::{DEFAULT_MAX_QUERY_LEN, DocumentHost, HostError};

/// A span of a [`MemDocument`], in character offsets.
///
/// Stamped with the revision it was minted at; any mutation of the document
/// invalidates all previously issued ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemRange {
    start_char: usize,
    len_chars: usize,
    revision: u64,
}

impl MemRange {
    /// Inclusive start character offset.
    pub fn start(&self) -> usize {
        self.start_char
    }

    /// Length of the span in characters.
    pub fn len(&self) -> usize {
        self.len_chars
    }

    /// Whether the span is empty.
    pub fn is_empty(&self) -> bool {
        self.len_chars == 0
    }
}

/// An in-memory document implementing [`DocumentHost`].
#[derive(Debug, Clone)]
pub struct MemDocument {
    text: String,
    max_query_len: usize,
    revision: u64,
    selection: Option<(usize, usize)>,
}

impl MemDocument {
    /// Create a document with the default 255-character query limit.
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_query_limit(text, DEFAULT_MAX_QUERY_LEN)
    }

    /// Create a document with a custom query limit (useful for exercising the
    /// chunked path with small inputs).
    pub fn with_query_limit(text: impl Into<String>, max_query_len: usize) -> Self {
        Self {
            text: text.into(),
            max_query_len,
            revision: 0,
            selection: None,
        }
    }

    /// The full document text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Revision counter; incremented by every mutation.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The last selected span as a half-open character range, if any.
    ///
    /// Stands in for the real host's select/scroll feedback; purely cosmetic.
    pub fn selection(&self) -> Option<(usize, usize)> {
        self.selection
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

impl DocumentHost for MemDocument {
    type Range = MemRange;

    fn max_query_len(&self) -> usize {
        self.max_query_len
    }

    fn search(&mut self, query: &str) -> Result<Vec<MemRange>, HostError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let len_chars = query.chars().count();
        let mut ranges = Vec::new();
        for (byte_idx, _) in self.text.match_indices(query) {
            let start_char = self.text[..byte_idx].chars().count();
            ranges.push(MemRange {
                start_char,
                len_chars,
                revision: self.revision,
            });
        }
        Ok(ranges)
    }

    fn replace(&mut self, range: MemRange, text: &str) -> Result<(), HostError> {
        if range.revision != self.revision {
            return Err(HostError::StaleRange);
        }
        let start = self.byte_offset(range.start_char);
        let end = self.byte_offset(range.start_char + range.len_chars);
        self.text.replace_range(start..end, text);
        self.revision += 1;
        self.selection = Some((
            range.start_char,
            range.start_char + text.chars().count(),
        ));
        Ok(())
    }

    fn select(&mut self, range: &MemRange) {
        // Stale handles are ignored silently; selection is cosmetic.
        if range.revision == self.revision {
            self.selection = Some((range.start_char, range.start_char + range.len_chars));
        }
    }
}

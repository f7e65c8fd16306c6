//! In-crate test doubles: a scripted in-memory host and a canned generator.
//!
//! Kept deliberately small; the full-featured in-memory host lives in the
//! `redraft-memdoc` crate.

use crate::generate::{GenerateError, GenerationContext, TextGenerator};
use crate::host::{DEFAULT_MAX_QUERY_LEN, DocumentHost, HostError};

/// A span issued by [`ScriptedHost`], stamped with the revision it was minted
/// at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ScriptedRange {
    start_char: usize,
    len_chars: usize,
    revision: u64,
}

impl ScriptedRange {
    pub(crate) fn start(&self) -> usize {
        self.start_char
    }

    pub(crate) fn len(&self) -> usize {
        self.len_chars
    }
}

/// In-memory document host with call accounting for assertions.
pub(crate) struct ScriptedHost {
    text: String,
    limit: usize,
    revision: u64,
    search_calls: usize,
    longest_query: usize,
    fail_replace: Option<String>,
}

impl ScriptedHost {
    pub(crate) fn new(text: &str) -> Self {
        Self::with_limit(text, DEFAULT_MAX_QUERY_LEN)
    }

    pub(crate) fn with_limit(text: &str, limit: usize) -> Self {
        Self {
            text: text.to_owned(),
            limit,
            revision: 0,
            search_calls: 0,
            longest_query: 0,
            fail_replace: None,
        }
    }

    pub(crate) fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn search_calls(&self) -> usize {
        self.search_calls
    }

    /// Length in characters of the longest query seen so far.
    pub(crate) fn longest_query(&self) -> usize {
        self.longest_query
    }

    pub(crate) fn fail_next_replace(&mut self, message: &str) {
        self.fail_replace = Some(message.to_owned());
    }

    fn byte_offset(&self, char_offset: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_offset)
            .map(|(byte, _)| byte)
            .unwrap_or(self.text.len())
    }
}

impl DocumentHost for ScriptedHost {
    type Range = ScriptedRange;

    fn max_query_len(&self) -> usize {
        self.limit
    }

    fn search(&mut self, query: &str) -> Result<Vec<ScriptedRange>, HostError> {
        self.search_calls += 1;
        self.longest_query = self.longest_query.max(query.chars().count());
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let len_chars = query.chars().count();
        let mut ranges = Vec::new();
        for (byte_idx, _) in self.text.match_indices(query) {
            let start_char = self.text[..byte_idx].chars().count();
            ranges.push(ScriptedRange {
                start_char,
                len_chars,
                revision: self.revision,
            });
        }
        Ok(ranges)
    }

    fn replace(&mut self, range: ScriptedRange, text: &str) -> Result<(), HostError> {
        if let Some(message) = self.fail_replace.take() {
            return Err(HostError::Backend(message));
        }
        if range.revision != self.revision {
            return Err(HostError::StaleRange);
        }
        let start = self.byte_offset(range.start_char);
        let end = self.byte_offset(range.start_char + range.len_chars);
        self.text.replace_range(start..end, text);
        self.revision += 1;
        Ok(())
    }
}

/// Generator that always answers with the same text.
pub(crate) struct CannedGenerator {
    reply: String,
}

impl CannedGenerator {
    pub(crate) fn new(reply: &str) -> Self {
        Self {
            reply: reply.to_owned(),
        }
    }
}

impl TextGenerator for CannedGenerator {
    fn generate(&mut self, _context: &GenerationContext) -> Result<String, GenerateError> {
        Ok(self.reply.clone())
    }
}

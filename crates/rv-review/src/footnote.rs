//! Footnote collection.
//!
//! Notes are rendered where they occur in the text (as `@<fn>{id}`) while
//! their bodies are queued and written after the enclosing block.

use crate::escape::escape_param;

/// Pending footnote definitions for the current block.
#[derive(Debug, Default)]
pub struct Footnotes {
    pending: Vec<String>,
    anonymous: usize,
    total: usize,
}

impl Footnotes {
    /// Create an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier for a note without `text:id` (`fn1`, `fn2`, ...).
    pub fn next_anonymous_id(&mut self) -> String {
        self.anonymous += 1;
        format!("fn{}", self.anonymous)
    }

    /// Queue a footnote definition.
    ///
    /// Leading newlines and trailing whitespace are stripped from `text`
    /// before escaping.
    pub fn push(&mut self, id: &str, text: &str) {
        let body = text.trim_start_matches(['\n', '\r']).trim_end();
        self.pending
            .push(format!("//footnote[{id}][{}]", escape_param(body)));
        self.total += 1;
    }

    /// Take all queued definitions, leaving the collector empty.
    pub fn flush(&mut self) -> Vec<String> {
        std::mem::take(&mut self.pending)
    }

    /// Whether any definitions are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of footnotes collected so far.
    #[must_use]
    pub fn total(&self) -> usize {
        self.total
    }
}

//! Match span collection

use super::matcher::{CandidateSource, LiteralMatcher};
use super::window::FoldedText;
use crate::domain::{DeidError, Result};
use serde::{Deserialize, Serialize};

/// A confirmed `[start, end)` byte range of the document to mask
///
/// Spans may overlap and may repeat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MatchSpan {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
}

impl MatchSpan {
    /// Create a new span
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the span covers nothing
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check the span against a document
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::InvalidSpan`] unless `start < end <= len` and both
    /// offsets fall on character boundaries.
    pub fn validate(&self, document: &str) -> Result<()> {
        let valid = self.start < self.end
            && self.end <= document.len()
            && document.is_char_boundary(self.start)
            && document.is_char_boundary(self.end);

        if valid {
            Ok(())
        } else {
            Err(DeidError::InvalidSpan {
                start: self.start,
                end: self.end,
                len: document.len(),
            })
        }
    }
}

/// Span counts per candidate source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceCounts {
    /// Spans found by identifier matchers
    pub exact: usize,
    /// Spans found by fuzzy window matchers
    pub fuzzy: usize,
    /// Spans found by word matchers
    pub word: usize,
}

impl SourceCounts {
    /// Count one span for a source
    pub fn record(&mut self, source: CandidateSource) {
        match source {
            CandidateSource::Exact => self.exact += 1,
            CandidateSource::Fuzzy => self.fuzzy += 1,
            CandidateSource::Word => self.word += 1,
        }
    }

    /// Total spans
    pub fn total(&self) -> usize {
        self.exact + self.fuzzy + self.word
    }

    /// Add another set of counts
    pub fn merge(&mut self, other: &SourceCounts) {
        self.exact += other.exact;
        self.fuzzy += other.fuzzy;
        self.word += other.word;
    }
}

/// Accumulates spans from every matcher run over a document
///
/// No ordering or deduplication is applied; masking is order independent.
#[derive(Debug, Clone, Default)]
pub struct SpanCollector {
    spans: Vec<MatchSpan>,
    counts: SourceCounts,
}

impl SpanCollector {
    /// Create an empty collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one matcher over the document, returning how many spans it added
    pub fn collect(&mut self, text: &FoldedText, matcher: &LiteralMatcher) -> usize {
        let before = self.spans.len();
        for (start, end) in matcher.find_iter(text) {
            self.spans.push(MatchSpan::new(start, end));
            self.counts.record(matcher.source());
        }
        self.spans.len() - before
    }

    /// Run every matcher over the document
    pub fn collect_all(&mut self, text: &FoldedText, matchers: &[LiteralMatcher]) -> usize {
        matchers
            .iter()
            .map(|matcher| self.collect(text, matcher))
            .sum()
    }

    /// Collected spans
    pub fn spans(&self) -> &[MatchSpan] {
        &self.spans
    }

    /// Span counts per source
    pub fn counts(&self) -> SourceCounts {
        self.counts
    }

    /// Number of collected spans
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Whether nothing was collected
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Consume the collector, returning spans and counts
    pub fn into_parts(self) -> (Vec<MatchSpan>, SourceCounts) {
        (self.spans, self.counts)
    }
}

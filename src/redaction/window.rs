//! Sliding-window fuzzy matching
//!
//! Slides windows whose length is close to an identifier's length across the
//! document and keeps every window whose similarity reaches the threshold.

use super::config::RedactionConfig;
use super::similarity::{
    fold_case, fold_chars, meets_threshold, normalized_similarity, PrefixDistances, SCORE_EPSILON,
};
use serde::Serialize;

/// A scored document substring
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MatchWindow {
    /// Start byte offset
    pub start: usize,
    /// End byte offset (exclusive)
    pub end: usize,
    /// Similarity against the identifier
    pub similarity: f64,
}

impl MatchWindow {
    /// The window's text within `document`
    pub fn text<'a>(&self, document: &'a str) -> &'a str {
        &document[self.start..self.end]
    }
}

/// Case-folded view of a document with character-to-byte offsets
///
/// Built once per document and shared by every identifier. Folding maps each
/// character to exactly one character, so positions in the folded string map
/// back to the original through the character index.
#[derive(Debug, Clone)]
pub struct FoldedText {
    chars: Vec<char>,
    whitespace: Vec<bool>,
    /// Byte offset of every character, plus the total length at the end
    offsets: Vec<usize>,
    folded: String,
    /// Byte offset of every character in `folded`, plus its length at the end
    folded_offsets: Vec<usize>,
}

impl FoldedText {
    /// Index a document
    pub fn new(document: &str) -> Self {
        let capacity = document.chars().count();
        let mut chars = Vec::with_capacity(capacity);
        let mut whitespace = Vec::with_capacity(capacity);
        let mut offsets = Vec::with_capacity(capacity + 1);
        let mut folded = String::with_capacity(document.len());
        let mut folded_offsets = Vec::with_capacity(capacity + 1);

        for (offset, c) in document.char_indices() {
            let lower = fold_case(c);
            offsets.push(offset);
            folded_offsets.push(folded.len());
            chars.push(lower);
            whitespace.push(c.is_whitespace());
            folded.push(lower);
        }
        offsets.push(document.len());
        folded_offsets.push(folded.len());

        Self {
            chars,
            whitespace,
            offsets,
            folded,
            folded_offsets,
        }
    }

    /// Number of characters
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Whether the document is empty
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// The case-folded document
    pub fn folded(&self) -> &str {
        &self.folded
    }

    /// Map a byte range of [`folded`](Self::folded) back to the original
    /// document
    ///
    /// Returns `None` unless both ends fall on character boundaries.
    pub fn original_range(&self, folded_start: usize, folded_end: usize) -> Option<(usize, usize)> {
        let start = self.folded_offsets.binary_search(&folded_start).ok()?;
        let end = self.folded_offsets.binary_search(&folded_end).ok()?;
        Some((self.offsets[start], self.offsets[end]))
    }

    fn byte_range(&self, start: usize, len: usize) -> (usize, usize) {
        (self.offsets[start], self.offsets[start + len])
    }
}

/// Generates fuzzy [`MatchWindow`]s for identifiers
#[derive(Debug, Clone)]
pub struct WindowGenerator {
    threshold: f64,
    window_slack: usize,
    fuzzy_min_length: usize,
}

impl WindowGenerator {
    /// Create a generator from a validated configuration
    pub fn new(config: &RedactionConfig) -> Self {
        Self {
            threshold: config.similarity_threshold,
            window_slack: config.window_slack,
            fuzzy_min_length: config.fuzzy_min_length,
        }
    }

    /// Maximum window length deviation for an identifier of `n` characters
    pub fn neighborhood(&self, n: usize) -> usize {
        let reachable = (n as f64 * (1.0 - self.threshold) + SCORE_EPSILON).floor() as usize;
        reachable.min(self.window_slack)
    }

    /// Windows of `document` similar to `identifier`
    ///
    /// Convenience wrapper that indexes the document on every call.
    pub fn generate(&self, document: &str, identifier: &str) -> Vec<MatchWindow> {
        self.windows(&FoldedText::new(document), identifier)
    }

    /// Windows of an indexed document similar to `identifier`, ordered by
    /// start offset then length
    ///
    /// Windows starting or ending on whitespace are skipped. Identifiers
    /// shorter than `fuzzy_min_length` characters produce no windows.
    pub fn windows(&self, text: &FoldedText, identifier: &str) -> Vec<MatchWindow> {
        let needle = fold_chars(identifier.trim());
        let n = needle.len();
        if n == 0 || n < self.fuzzy_min_length || text.is_empty() {
            return Vec::new();
        }

        let k = self.neighborhood(n);
        let min_len = n.saturating_sub(k).max(1);
        let max_len = (n + k).min(text.len());
        if min_len > max_len {
            return Vec::new();
        }

        // One distance pass per start offset covers every window length
        let distances = PrefixDistances::new(&needle);
        let mut prefix = Vec::with_capacity(max_len + 1);
        let mut windows = Vec::new();

        for start in 0..text.len() {
            if start + min_len > text.len() {
                break;
            }
            if text.whitespace[start] {
                continue;
            }

            let limit = (start + max_len).min(text.len());
            distances.compute(&text.chars[start..limit], &mut prefix);

            for len in min_len..=(limit - start) {
                if text.whitespace[start + len - 1] {
                    continue;
                }

                let score = normalized_similarity(prefix[len], n, len);
                if meets_threshold(score, self.threshold) {
                    let (start_byte, end_byte) = text.byte_range(start, len);
                    windows.push(MatchWindow {
                        start: start_byte,
                        end: end_byte,
                        similarity: score,
                    });
                }
            }
        }

        tracing::trace!(
            identifier_len = n,
            neighborhood = k,
            accepted = windows.len(),
            "Generated fuzzy windows"
        );

        windows
    }
}

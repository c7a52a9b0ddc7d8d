//! Redaction result model

use super::spans::{MatchSpan, SourceCounts};
use crate::domain::DocumentKey;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result of redacting one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedactionOutcome {
    /// Key of the source document, when known
    pub key: Option<DocumentKey>,
    /// Masked document text
    pub redacted_text: String,
    /// Every span that was masked (unordered, may overlap)
    pub spans: Vec<MatchSpan>,
    /// Span counts per candidate source
    pub counts: SourceCounts,
    /// Identifiers that were expanded
    pub identifiers_processed: usize,
    /// Candidates that could not be compiled
    pub compilation_failures: usize,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    /// Timestamp of redaction
    pub timestamp: DateTime<Utc>,
}

impl RedactionOutcome {
    /// Create a new outcome
    pub fn new(
        key: Option<DocumentKey>,
        redacted_text: String,
        spans: Vec<MatchSpan>,
        counts: SourceCounts,
    ) -> Self {
        Self {
            key,
            redacted_text,
            spans,
            counts,
            identifiers_processed: 0,
            compilation_failures: 0,
            processing_time_ms: 0,
            timestamp: Utc::now(),
        }
    }

    /// Outcome for a document left untouched
    pub fn unchanged(key: Option<DocumentKey>, text: &str) -> Self {
        Self::new(key, text.to_string(), Vec::new(), SourceCounts::default())
    }

    /// Get total number of spans
    pub fn total_spans(&self) -> usize {
        self.spans.len()
    }

    /// Check if anything was masked
    pub fn has_redactions(&self) -> bool {
        !self.spans.is_empty()
    }

    /// Whether some candidates were lost to compilation failures
    pub fn is_partial(&self) -> bool {
        self.compilation_failures > 0
    }
}

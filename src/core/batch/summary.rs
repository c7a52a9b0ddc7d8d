//! Batch summary and reporting
//!
//! This module defines structures for tracking and reporting batch results.

use crate::domain::DocumentKey;
use crate::redaction::{RedactionOutcome, RedactionReport};
use std::time::Duration;

/// Summary of a batch run
#[derive(Debug, Clone)]
pub struct BatchSummary {
    /// Documents read from the input
    pub total_documents: usize,

    /// Documents redacted and kept for output
    pub redacted_documents: usize,

    /// Documents that failed and were left out of the output
    pub failed_documents: usize,

    /// Documents not processed because of a shutdown request
    pub skipped_documents: usize,

    /// Whether the run was interrupted by a shutdown request
    pub interrupted: bool,

    /// Whether output was suppressed
    pub dry_run: bool,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered during the run
    pub errors: Vec<BatchError>,

    /// Aggregated redaction statistics
    pub report: RedactionReport,
}

impl BatchSummary {
    /// Create a new empty summary
    pub fn new(total_documents: usize) -> Self {
        Self {
            total_documents,
            redacted_documents: 0,
            failed_documents: 0,
            skipped_documents: 0,
            interrupted: false,
            dry_run: false,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            report: RedactionReport::new(),
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Record a redacted document
    pub fn add_outcome(&mut self, outcome: &RedactionOutcome) {
        self.redacted_documents += 1;
        self.report.add_outcome(outcome);
    }

    /// Record a failed document
    pub fn add_error(&mut self, error: BatchError) {
        self.failed_documents += 1;
        self.errors.push(error);
    }

    /// Record documents left unprocessed by shutdown
    pub fn add_skipped(&mut self, count: usize) {
        self.skipped_documents += count;
    }

    /// Total spans masked across the batch
    pub fn total_spans(&self) -> usize {
        self.report.total_spans
    }

    /// Check if every document was redacted
    pub fn is_successful(&self) -> bool {
        self.failed_documents == 0 && self.skipped_documents == 0
    }

    /// Get success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_documents == 0 {
            return 100.0;
        }
        (self.redacted_documents as f64 / self.total_documents as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_documents = self.total_documents,
            redacted = self.redacted_documents,
            failed = self.failed_documents,
            skipped = self.skipped_documents,
            spans = self.total_spans(),
            compilation_failures = self.report.compilation_failures,
            interrupted = self.interrupted,
            dry_run = self.dry_run,
            duration_ms = self.duration.as_millis() as u64,
            success_rate = format!("{:.2}%", self.success_rate()),
            "Batch completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(
                error_count = self.errors.len(),
                "Batch completed with errors"
            );
            for error in &self.errors {
                tracing::warn!(
                    document_key = %error.key,
                    message = %error.message,
                    "Document failed"
                );
            }
        }
    }
}

/// Failure of one document
#[derive(Debug, Clone)]
pub struct BatchError {
    /// Key of the failed document
    pub key: DocumentKey,

    /// Error message (never contains document or identifier text)
    pub message: String,
}

impl BatchError {
    /// Create a new batch error
    pub fn new(key: DocumentKey, message: impl Into<String>) -> Self {
        Self {
            key,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(value: &str) -> DocumentKey {
        DocumentKey::new(value).unwrap()
    }

    #[test]
    fn test_batch_summary_creation() {
        let summary = BatchSummary::new(5);
        assert_eq!(summary.total_documents, 5);
        assert_eq!(summary.redacted_documents, 0);
        assert_eq!(summary.duration, Duration::from_secs(0));
        assert!(summary.errors.is_empty());
        assert!(summary.is_successful());
    }

    #[test]
    fn test_batch_summary_with_duration() {
        let summary = BatchSummary::new(0).with_duration(Duration::from_secs(3));
        assert_eq!(summary.duration, Duration::from_secs(3));
    }

    #[test]
    fn test_add_outcome_and_error() {
        let mut summary = BatchSummary::new(2);
        summary.add_outcome(&RedactionOutcome::unchanged(Some(key("a")), "text"));
        summary.add_error(BatchError::new(key("b"), "boom"));

        assert_eq!(summary.redacted_documents, 1);
        assert_eq!(summary.failed_documents, 1);
        assert_eq!(summary.report.total_documents, 1);
        assert!(!summary.is_successful());
        assert_eq!(summary.success_rate(), 50.0);
    }

    #[test]
    fn test_skipped_documents_are_not_successful() {
        let mut summary = BatchSummary::new(4);
        summary.add_skipped(2);
        assert_eq!(summary.skipped_documents, 2);
        assert!(!summary.is_successful());
    }

    #[test]
    fn test_success_rate_empty_batch() {
        assert_eq!(BatchSummary::new(0).success_rate(), 100.0);
    }
}

//! Aggregate redaction reporting
//!
//! Collects per-document outcomes into totals for dry runs and batch
//! summaries. Only counts are kept, never document or identifier text.

use super::outcome::RedactionOutcome;
use super::spans::SourceCounts;
use serde::{Deserialize, Serialize};

/// Aggregated redaction statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RedactionReport {
    /// Total documents redacted
    pub total_documents: usize,

    /// Total spans masked
    pub total_spans: usize,

    /// Spans per candidate source
    pub spans_by_source: SourceCounts,

    /// Candidates that failed to compile
    pub compilation_failures: usize,

    /// Warnings collected while processing
    pub warnings: Vec<String>,

    /// Processing statistics
    pub stats: ProcessingStats,
}

/// Processing statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessingStats {
    /// Average processing time per document (ms)
    pub avg_processing_time_ms: u64,

    /// Total processing time (ms)
    pub total_processing_time_ms: u64,

    /// Documents with at least one span
    pub documents_with_redactions: usize,

    /// Documents left unchanged
    pub documents_without_redactions: usize,

    /// Documents where some candidates failed to compile
    pub partial_documents: usize,
}

impl RedactionReport {
    /// Create a new empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add results from a redacted document
    pub fn add_outcome(&mut self, outcome: &RedactionOutcome) {
        self.total_documents += 1;
        self.total_spans += outcome.total_spans();
        self.spans_by_source.merge(&outcome.counts);
        self.compilation_failures += outcome.compilation_failures;
        self.stats.total_processing_time_ms += outcome.processing_time_ms;

        if outcome.has_redactions() {
            self.stats.documents_with_redactions += 1;
        } else {
            self.stats.documents_without_redactions += 1;
        }

        if outcome.is_partial() {
            self.stats.partial_documents += 1;
            self.add_warning(format!(
                "Document {} was only partially redacted: {} candidate(s) failed to compile",
                outcome
                    .key
                    .as_ref()
                    .map(|k| k.as_str())
                    .unwrap_or("unknown"),
                outcome.compilation_failures
            ));
        }

        self.stats.avg_processing_time_ms =
            self.stats.total_processing_time_ms / self.total_documents as u64;
    }

    /// Add a warning
    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                       REDACTION REPORT                        \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        output.push_str(&format!(
            "  Documents Processed:         {}\n",
            self.total_documents
        ));
        output.push_str(&format!(
            "  Documents with Redactions:   {}\n",
            self.stats.documents_with_redactions
        ));
        output.push_str(&format!(
            "  Documents Unchanged:         {}\n",
            self.stats.documents_without_redactions
        ));
        output.push_str(&format!("  Total Spans Masked:          {}\n", self.total_spans));
        output.push_str(&format!(
            "  Avg Processing Time:         {} ms\n",
            self.stats.avg_processing_time_ms
        ));
        output.push('\n');

        if self.total_spans > 0 {
            output.push_str("🔍 SPANS BY SOURCE\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            output.push_str(&format!("  {:30} {:>5}\n", "exact", self.spans_by_source.exact));
            output.push_str(&format!("  {:30} {:>5}\n", "fuzzy", self.spans_by_source.fuzzy));
            output.push_str(&format!("  {:30} {:>5}\n", "word", self.spans_by_source.word));
            output.push('\n');
        }

        if !self.warnings.is_empty() {
            output.push_str("⚠️  WARNINGS\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for warning in &self.warnings {
                output.push_str(&format!("  • {warning}\n"));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write report to file
    pub fn write_to_file(&self, path: &std::path::Path) -> std::io::Result<()> {
        let json = self.format_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}

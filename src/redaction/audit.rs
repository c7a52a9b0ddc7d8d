//! Audit logger for redaction operations
//!
//! One line per redacted document. Matched text is only ever recorded as a
//! SHA-256 hash.

use super::outcome::RedactionOutcome;
use crate::domain::{DeidError, Result};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Audit log entry
#[derive(Debug, Serialize)]
struct AuditLogEntry {
    timestamp: String,
    document_key: String,
    spans_total: usize,
    spans_exact: usize,
    spans_fuzzy: usize,
    spans_word: usize,
    compilation_failures: usize,
    processing_time_ms: u64,
    /// SHA-256 of each distinct masked substring (lowercased)
    span_hashes: Vec<String>,
}

/// Audit logger for redaction operations
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    write_lock: Mutex<()>,
}

impl AuditLogger {
    /// Create a new audit logger, creating the log directory if needed
    pub fn new(log_path: PathBuf, json_format: bool) -> Result<Self> {
        if let Some(parent) = log_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DeidError::Io(format!(
                        "Failed to create audit log directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the audit log
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    /// Log a redacted document
    ///
    /// `original` is the unredacted text the outcome's spans refer to.
    pub fn log_redaction(&self, outcome: &RedactionOutcome, original: &str) -> Result<()> {
        let span_hashes: BTreeSet<String> = outcome
            .spans
            .iter()
            .filter_map(|span| original.get(span.start..span.end))
            .map(|text| hash_value(&text.to_lowercase()))
            .collect();

        let entry = AuditLogEntry {
            timestamp: outcome.timestamp.to_rfc3339(),
            document_key: outcome
                .key
                .as_ref()
                .map(|k| k.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            spans_total: outcome.total_spans(),
            spans_exact: outcome.counts.exact,
            spans_fuzzy: outcome.counts.fuzzy,
            spans_word: outcome.counts.word,
            compilation_failures: outcome.compilation_failures,
            processing_time_ms: outcome.processing_time_ms,
            span_hashes: span_hashes.into_iter().collect(),
        };

        self.write_entry(&entry)
    }

    fn write_entry(&self, entry: &AuditLogEntry) -> Result<()> {
        let line = if self.json_format {
            serde_json::to_string(entry)?
        } else {
            format!(
                "[{}] Document: {} | Spans: {} (exact {}, fuzzy {}, word {}) | Failures: {} | Time: {}ms",
                entry.timestamp,
                entry.document_key,
                entry.spans_total,
                entry.spans_exact,
                entry.spans_fuzzy,
                entry.spans_word,
                entry.compilation_failures,
                entry.processing_time_ms
            )
        };

        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| DeidError::Other("Audit log lock poisoned".to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .map_err(|e| {
                DeidError::Io(format!(
                    "Failed to open audit log {}: {e}",
                    self.log_path.display()
                ))
            })?;

        writeln!(file, "{line}")?;
        Ok(())
    }
}

/// Hash a value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentKey;
    use crate::redaction::spans::{MatchSpan, SourceCounts};
    use tempfile::tempdir;

    fn outcome() -> RedactionOutcome {
        let mut counts = SourceCounts::default();
        counts.exact = 1;
        counts.word = 1;
        let mut outcome = RedactionOutcome::new(
            Some(DocumentKey::new("doc-42").unwrap()),
            "Patient XXXXXXXXXX seen".to_string(),
            vec![MatchSpan::new(8, 18), MatchSpan::new(13, 18)],
            counts,
        );
        outcome.processing_time_ms = 3;
        outcome
    }

    #[test]
    fn test_hash_value() {
        assert_eq!(hash_value("smith"), hash_value("smith"));
        assert_ne!(hash_value("smith"), hash_value("smyth"));
        assert_eq!(hash_value("").len(), 64);
    }

    #[test]
    fn test_log_redaction_json() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("nested").join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), true).unwrap();

        logger
            .log_redaction(&outcome(), "Patient John Smith seen")
            .unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        let entry: serde_json::Value = serde_json::from_str(content.trim()).unwrap();
        assert_eq!(entry["document_key"], "doc-42");
        assert_eq!(entry["spans_total"], 2);
        assert_eq!(entry["span_hashes"].as_array().unwrap().len(), 2);
        assert!(!content.contains("John"));
        assert!(!content.contains("Smith"));
    }

    #[test]
    fn test_log_redaction_plain_text_appends() {
        let dir = tempdir().unwrap();
        let log_path = dir.path().join("audit.log");
        let logger = AuditLogger::new(log_path.clone(), false).unwrap();

        logger.log_redaction(&outcome(), "Patient John Smith seen").unwrap();
        logger.log_redaction(&outcome(), "Patient John Smith seen").unwrap();

        let content = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("Document: doc-42"));
        assert!(!content.contains("Smith"));
    }
}

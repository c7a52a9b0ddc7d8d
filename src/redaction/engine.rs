//! Redaction engine
//!
//! This module provides the [`RedactionEngine`] that drives the pipeline for a
//! single document:
//!
//! 1. Each identifier is expanded into candidates (itself, fuzzy windows, words)
//! 2. Candidates are compiled into case-insensitive literal matchers
//! 3. Every matcher is run over the document, accumulating spans
//! 4. The spans are masked in one length-preserving pass
//!
//! # Examples
//!
//! ```
//! use deid::redaction::{RedactionConfig, RedactionEngine};
//!
//! let engine = RedactionEngine::new(RedactionConfig::new(1.0, 3))?;
//! let redacted = engine.redact("Patient John Smith was seen on 2020-01-01.", &["John Smith"])?;
//! assert_eq!(redacted, "Patient XXXXXXXXXX was seen on 2020-01-01.");
//! # Ok::<(), deid::domain::DeidError>(())
//! ```

use super::audit::AuditLogger;
use super::config::RedactionConfig;
use super::mask::apply_mask;
use super::matcher::{CompiledPatterns, PatternCompiler};
use super::outcome::RedactionOutcome;
use super::spans::SpanCollector;
use super::window::FoldedText;
use crate::domain::{DeidError, Document, DocumentKey, Result};
use std::time::Instant;
use tokio::sync::watch;

/// Approximate-match redaction engine
///
/// The engine holds no per-call state and can be shared across worker
/// threads behind an `Arc`. Each call is a blocking, CPU-bound operation.
pub struct RedactionEngine {
    config: RedactionConfig,
    compiler: PatternCompiler,
    audit_logger: Option<AuditLogger>,
}

impl RedactionEngine {
    /// Create an engine, validating the configuration up front
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Configuration`] when the configuration is invalid.
    pub fn new(config: RedactionConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            compiler: PatternCompiler::new(&config),
            config,
            audit_logger: None,
        })
    }

    /// Record every redacted document through an audit logger
    pub fn with_audit(mut self, audit_logger: AuditLogger) -> Self {
        self.audit_logger = Some(audit_logger);
        self
    }

    /// Configuration in use
    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Whether an audit logger is attached
    pub fn is_audited(&self) -> bool {
        self.audit_logger.is_some()
    }

    /// Redact a document, returning only the masked text
    ///
    /// The result always has the same number of characters as `document`.
    /// An empty identifier list returns the document unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::PatternCompilation`] only in strict mode.
    pub fn redact<S: AsRef<str>>(&self, document: &str, identifiers: &[S]) -> Result<String> {
        self.run(None, document, identifiers, None)
            .map(|outcome| outcome.redacted_text)
    }

    /// Redact raw bytes that must be valid UTF-8
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Encoding`] when `bytes` is not valid UTF-8.
    pub fn redact_bytes<S: AsRef<str>>(&self, bytes: &[u8], identifiers: &[S]) -> Result<String> {
        let document = std::str::from_utf8(bytes)?;
        self.redact(document, identifiers)
    }

    /// Redact a keyed document, returning spans, counts and timing
    ///
    /// The outcome is written to the audit log when one is attached.
    pub fn redact_document<S: AsRef<str>>(
        &self,
        document: &Document,
        identifiers: &[S],
    ) -> Result<RedactionOutcome> {
        let outcome = self.run(Some(&document.key), &document.text, identifiers, None)?;
        self.audit(&outcome, &document.text)?;
        Ok(outcome)
    }

    /// Redact a keyed document, stopping between identifiers once `shutdown`
    /// is set
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Cancelled`] when shutdown was requested before the
    /// document finished.
    pub fn redact_with_shutdown<S: AsRef<str>>(
        &self,
        document: &Document,
        identifiers: &[S],
        shutdown: &watch::Receiver<bool>,
    ) -> Result<RedactionOutcome> {
        let outcome = self.run(
            Some(&document.key),
            &document.text,
            identifiers,
            Some(shutdown),
        )?;
        self.audit(&outcome, &document.text)?;
        Ok(outcome)
    }

    fn run<S: AsRef<str>>(
        &self,
        key: Option<&DocumentKey>,
        document: &str,
        identifiers: &[S],
        shutdown: Option<&watch::Receiver<bool>>,
    ) -> Result<RedactionOutcome> {
        let started = Instant::now();

        if document.is_empty() || identifiers.is_empty() {
            return Ok(RedactionOutcome::unchanged(key.cloned(), document));
        }

        let text = FoldedText::new(document);
        let mut collector = SpanCollector::new();
        let mut compilation_failures = 0;

        for identifier in identifiers {
            if shutdown.is_some_and(|rx| *rx.borrow()) {
                tracing::info!(
                    document_key = key.map(|k| k.as_str()).unwrap_or("unknown"),
                    "Redaction cancelled by shutdown signal"
                );
                return Err(DeidError::Cancelled);
            }

            let candidates = self
                .compiler
                .candidates(&text, document, identifier.as_ref());
            let compiled = self.compiler.compile(&candidates);
            compilation_failures += self.collect_compiled(compiled, &text, &mut collector)?;
        }

        let (spans, counts) = collector.into_parts();
        let redacted = apply_mask(document, &spans, self.config.mask_char)?;

        let mut outcome = RedactionOutcome::new(key.cloned(), redacted, spans, counts);
        outcome.identifiers_processed = identifiers.len();
        outcome.compilation_failures = compilation_failures;
        outcome.processing_time_ms = started.elapsed().as_millis() as u64;

        tracing::debug!(
            document_key = key.map(|k| k.as_str()).unwrap_or("unknown"),
            identifiers = identifiers.len(),
            spans = outcome.total_spans(),
            exact = counts.exact,
            fuzzy = counts.fuzzy,
            word = counts.word,
            compilation_failures,
            duration_ms = outcome.processing_time_ms,
            "Document redacted"
        );

        Ok(outcome)
    }

    /// Run one identifier's matchers over the document, returning how many of
    /// its candidates failed to compile
    ///
    /// In strict mode the first failure is returned instead and nothing from
    /// this identifier is collected.
    fn collect_compiled(
        &self,
        compiled: CompiledPatterns,
        text: &FoldedText,
        collector: &mut SpanCollector,
    ) -> Result<usize> {
        let CompiledPatterns { matchers, failures } = compiled;
        let failed = failures.len();

        if self.config.strict_compilation {
            if let Some(error) = failures.into_iter().next() {
                return Err(error);
            }
        }

        collector.collect_all(text, &matchers);
        Ok(failed)
    }

    fn audit(&self, outcome: &RedactionOutcome, original: &str) -> Result<()> {
        match &self.audit_logger {
            Some(logger) => logger.log_redaction(outcome, original),
            None => Ok(()),
        }
    }
}

/// Redact `document` with a one-off engine built from `config`
///
/// # Errors
///
/// Returns [`DeidError::Configuration`] before any matching when `config` is
/// invalid.
pub fn redact<S: AsRef<str>>(
    document: &str,
    identifiers: &[S],
    config: &RedactionConfig,
) -> Result<String> {
    RedactionEngine::new(config.clone())?.redact(document, identifiers)
}

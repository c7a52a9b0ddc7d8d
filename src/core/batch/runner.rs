//! Concurrent batch redaction
//!
//! Each document is redacted on the blocking thread pool, bounded by a
//! semaphore. Identifier lookup happens on the async side before dispatch.
//! Output keeps input order; failed documents are left out of it.

use super::summary::{BatchError, BatchSummary};
use crate::adapters::jsonl::{read_documents, write_documents};
use crate::adapters::terms::TermSource;
use crate::core::lifecycle::{Lifecycle, LifecycleEvent, RunnerState};
use crate::domain::{DeidError, Document, DocumentKey, Result};
use crate::redaction::{RedactionEngine, RedactionOutcome};
use crate::{log_batch_complete, log_batch_progress};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{watch, Semaphore};
use tokio::task::JoinHandle;

/// Default number of documents redacted at once
pub const DEFAULT_MAX_CONCURRENCY: usize = 4;

/// Output of a batch run
#[derive(Debug)]
pub struct BatchOutput {
    /// Redacted documents in input order
    pub documents: Vec<Document>,
    /// Run statistics
    pub summary: BatchSummary,
}

/// Redacts many documents concurrently with one shared engine
pub struct BatchRunner {
    engine: Arc<RedactionEngine>,
    terms: Arc<dyn TermSource>,
    max_concurrency: usize,
    shutdown: watch::Receiver<bool>,
    lifecycle: Lifecycle,
}

impl BatchRunner {
    /// Create a runner
    pub fn new(
        engine: Arc<RedactionEngine>,
        terms: Arc<dyn TermSource>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        Self {
            engine,
            terms,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            shutdown,
            lifecycle: Lifecycle::new(),
        }
    }

    /// Set how many documents are redacted at once (at least one)
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    /// Current lifecycle state
    pub fn state(&self) -> RunnerState {
        self.lifecycle.state()
    }

    fn shutdown_requested(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Redact `documents`, returning redacted copies in input order
    ///
    /// A runner is single-use: calling this again after it stopped fails.
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Batch`] if the runner already ran. Per-document
    /// failures are recorded in the summary instead.
    pub async fn run(&mut self, documents: Vec<Document>) -> Result<BatchOutput> {
        let started = Instant::now();
        let total = documents.len();
        let mut summary = BatchSummary::new(total);

        if self.shutdown_requested() {
            self.lifecycle.apply(LifecycleEvent::StopRequested)?;
            tracing::warn!(total, "Shutdown requested before batch start");
            summary.interrupted = true;
            summary.add_skipped(total);
            return Ok(BatchOutput {
                documents: Vec::new(),
                summary: summary.with_duration(started.elapsed()),
            });
        }

        self.lifecycle.apply(LifecycleEvent::Started)?;
        tracing::info!(
            total,
            max_concurrency = self.max_concurrency,
            term_source = self.terms.name(),
            "Starting batch redaction"
        );

        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));
        let mut in_flight: Vec<(DocumentKey, JoinHandle<Result<RedactionOutcome>>)> =
            Vec::with_capacity(total);

        for (index, document) in documents.into_iter().enumerate() {
            let permit = Arc::clone(&semaphore)
                .acquire_owned()
                .await
                .map_err(|e| DeidError::Batch(format!("Worker pool closed: {e}")))?;

            if self.shutdown_requested() {
                tracing::warn!(
                    dispatched = index,
                    remaining = total - index,
                    "Shutdown requested, no further documents will be dispatched"
                );
                summary.interrupted = true;
                summary.add_skipped(total - index);
                break;
            }

            log_batch_progress!(index + 1, total);

            let terms = match self.terms.terms_for(&document.key).await {
                Ok(terms) => terms,
                Err(e) => {
                    tracing::error!(document_key = %document.key, error = %e, "Term lookup failed");
                    summary.add_error(BatchError::new(
                        document.key.clone(),
                        format!("Term lookup failed: {e}"),
                    ));
                    continue;
                }
            };

            let key = document.key.clone();
            let engine = Arc::clone(&self.engine);
            let shutdown = self.shutdown.clone();
            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                engine.redact_with_shutdown(&document, &terms, &shutdown)
            });
            in_flight.push((key, handle));
        }

        self.lifecycle.apply(LifecycleEvent::StopRequested)?;

        let mut redacted = Vec::with_capacity(in_flight.len());
        for (key, handle) in in_flight {
            match handle.await {
                Ok(Ok(outcome)) => {
                    summary.add_outcome(&outcome);
                    redacted.push(Document::new(key, outcome.redacted_text));
                }
                Ok(Err(DeidError::Cancelled)) => {
                    summary.interrupted = true;
                    summary.add_skipped(1);
                }
                Ok(Err(e)) => {
                    tracing::error!(document_key = %key, error = %e, "Redaction failed");
                    summary.add_error(BatchError::new(key, e.to_string()));
                }
                Err(e) => {
                    tracing::error!(document_key = %key, error = %e, "Redaction task failed");
                    summary.add_error(BatchError::new(key, format!("Worker task failed: {e}")));
                }
            }
        }

        self.lifecycle.apply(LifecycleEvent::Drained)?;

        let summary = summary.with_duration(started.elapsed());
        log_batch_complete!(summary.redacted_documents, summary.duration);

        Ok(BatchOutput {
            documents: redacted,
            summary,
        })
    }

    /// Redact a JSON Lines file into another
    ///
    /// With `dry_run` the documents are redacted and summarized but nothing
    /// is written.
    pub async fn run_files(
        &mut self,
        input: impl AsRef<Path>,
        output: impl AsRef<Path>,
        dry_run: bool,
    ) -> Result<BatchSummary> {
        let documents = read_documents(input).await?;
        let BatchOutput {
            documents,
            mut summary,
        } = self.run(documents).await?;
        summary.dry_run = dry_run;

        if dry_run {
            tracing::info!(
                documents = documents.len(),
                "Dry run, skipping output"
            );
        } else {
            write_documents(output, &documents).await?;
        }

        Ok(summary)
    }
}

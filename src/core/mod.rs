//! Core orchestration for deid.
//!
//! # Modules
//!
//! - [`batch`] - Concurrent batch redaction and summaries
//! - [`lifecycle`] - Runner state machine
//!
//! # Batch Workflow
//!
//! 1. **Read**: Load documents from a JSON Lines file
//! 2. **Lookup**: Fetch each document's identifiers from the term source
//! 3. **Redact**: Run the engine on the blocking pool, bounded by `max_concurrency`
//! 4. **Write**: Store redacted documents in input order (skipped in dry-run)
//! 5. **Report**: Produce a [`batch::BatchSummary`]
//!
//! # Example
//!
//! ```rust,no_run
//! use deid::adapters::terms::FileTermSource;
//! use deid::core::batch::BatchRunner;
//! use deid::redaction::{RedactionConfig, RedactionEngine};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Arc::new(RedactionEngine::new(RedactionConfig::default())?);
//! let terms = Arc::new(FileTermSource::load("terms.json").await?);
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//!
//! let mut runner = BatchRunner::new(engine, terms, shutdown_rx).with_max_concurrency(8);
//! let summary = runner
//!     .run_files("documents.jsonl", "redacted.jsonl", false)
//!     .await?;
//!
//! println!("Redacted: {}", summary.redacted_documents);
//! println!("Failed: {}", summary.failed_documents);
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod lifecycle;

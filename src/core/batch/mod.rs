//! Batch redaction
//!
//! This module runs the redaction engine over many documents, looking up
//! each document's identifiers through a [`TermSource`](crate::adapters::terms::TermSource).

pub mod runner;
pub mod summary;

pub use runner::{BatchOutput, BatchRunner, DEFAULT_MAX_CONCURRENCY};
pub use summary::{BatchError, BatchSummary};

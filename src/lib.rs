// Deid - Clinical Document Redaction
// Copyright (c) 2025 Deid Contributors
// Licensed under the MIT License

//! # Deid - Approximate-Match Clinical Document Redaction
//!
//! Deid masks known patient identifiers in free-text clinical documents before
//! they are indexed downstream. Given a document and the identifiers known for
//! its subject, it finds exact, fuzzy and word-level occurrences and replaces
//! each with a run of mask characters of the same length.
//!
//! ## Overview
//!
//! This library provides:
//! - **Scoring** windows of text against identifiers with normalized edit distance
//! - **Matching** identifiers, near-misses and long words as case-insensitive literals
//! - **Masking** every match without changing the document length
//! - **Batching** many documents concurrently with graceful shutdown
//!
//! ## Architecture
//!
//! - [`redaction`] - The redaction engine and its building blocks
//! - [`core`] - Batch orchestration and runner lifecycle
//! - [`adapters`] - Identifier lookup and JSON Lines documents
//! - [`domain`] - Core domain types and errors
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//! - [`cli`] - Command-line interface
//!
//! ## Quick Start
//!
//! ```rust
//! use deid::redaction::{RedactionConfig, RedactionEngine};
//!
//! # fn main() -> Result<(), deid::domain::DeidError> {
//! let engine = RedactionEngine::new(RedactionConfig::new(0.8, 3))?;
//!
//! let redacted = engine.redact("Jon Smyth attended.", &["John Smith"])?;
//! assert_eq!(redacted, "XXXXXXXXX attended.");
//! # Ok(())
//! # }
//! ```
//!
//! ## Guarantees
//!
//! - The redacted document has exactly as many characters as the input
//! - An empty identifier list returns the document unchanged
//! - Redacting an already redacted document changes nothing further
//! - Identifier words of `min_word_length` characters or fewer are never matched on their own
//!
//! ## Error Handling
//!
//! All fallible operations return [`domain::DeidError`]. Configuration errors
//! are raised before any matching work:
//!
//! ```rust
//! use deid::redaction::{redact, RedactionConfig};
//!
//! let err = redact("text", &["text"], &RedactionConfig::new(1.5, 3)).unwrap_err();
//! assert!(err.is_configuration());
//! ```
//!
//! ## Logging
//!
//! Deid uses structured logging with the `tracing` crate. Events carry
//! document keys and counts, never identifier or document text.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
pub mod redaction;

//! External system integrations for deid.
//!
//! - [`terms`] - Identifier lookup by document key ([`terms::TermSource`])
//! - [`jsonl`] - JSON Lines document input and output
//!
//! # Design Pattern
//!
//! Adapters isolate where identifiers and documents live from the redaction
//! engine. The term lookup is trait-based so tests and embedders can supply
//! their own store.
//!
//! ```rust,no_run
//! use deid::adapters::terms::{FileTermSource, TermSource};
//! use deid::domain::DocumentKey;
//!
//! # async fn example() -> deid::domain::Result<()> {
//! let source = FileTermSource::load("terms.json").await?;
//! let terms = source.terms_for(&DocumentKey::new("note-001").unwrap()).await?;
//! println!("{} identifiers", terms.len());
//! # Ok(())
//! # }
//! ```

pub mod jsonl;
pub mod terms;

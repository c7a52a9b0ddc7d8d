//! Approximate-match redaction
//!
//! This module locates known identifiers in free text and masks them.
//!
//! # Overview
//!
//! - **Similarity scoring** ([`similarity`]): normalized Levenshtein similarity, case-insensitive
//! - **Window generation** ([`WindowGenerator`]): fuzzy windows near the identifier length
//! - **Word splitting** ([`split_words`]): identifier words above the minimum length
//! - **Pattern compilation** ([`PatternCompiler`], [`LiteralMatcher`]): literal, case-insensitive needles
//! - **Span collection** ([`SpanCollector`]): every match of every needle
//! - **Masking** ([`apply_mask`]): length-preserving replacement
//!
//! # Examples
//!
//! ```
//! use deid::redaction::{redact, RedactionConfig};
//!
//! let config = RedactionConfig::new(0.8, 3);
//! let redacted = redact("Jon Smyth attended.", &["John Smith"], &config)?;
//! assert_eq!(redacted, "XXXXXXXXX attended.");
//! # Ok::<(), deid::domain::DeidError>(())
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod mask;
pub mod matcher;
pub mod outcome;
pub mod report;
pub mod similarity;
pub mod spans;
pub mod window;
pub mod words;

pub use audit::AuditLogger;
pub use config::{AuditConfig, RedactionConfig};
pub use engine::{redact, RedactionEngine};
pub use mask::apply_mask;
pub use matcher::{Candidate, CandidateSource, LiteralMatcher, PatternCompiler};
pub use outcome::RedactionOutcome;
pub use report::RedactionReport;
pub use similarity::{levenshtein, similarity};
pub use spans::{MatchSpan, SourceCounts, SpanCollector};
pub use window::{FoldedText, MatchWindow, WindowGenerator};
pub use words::split_words;

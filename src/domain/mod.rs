//! Domain models and types for deid.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Strongly-typed keys** ([`DocumentKey`])
//! - **Domain models** ([`Document`])
//! - **Error types** ([`DeidError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible library operations return [`Result<T, DeidError>`]:
//!
//! ```rust
//! use deid::domain::Result;
//! use deid::redaction::RedactionConfig;
//!
//! fn example() -> Result<()> {
//!     RedactionConfig::default().validate()?;
//!     Ok(())
//! }
//! ```

pub mod document;
pub mod errors;
pub mod result;

pub use document::{Document, DocumentKey};
pub use errors::DeidError;
pub use result::Result;

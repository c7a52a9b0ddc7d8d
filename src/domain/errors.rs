//! Domain error types
//!
//! This module defines the error hierarchy for deid. Errors never carry
//! identifier or document text, only lengths, offsets and keys.

use thiserror::Error;

/// Main deid error type
///
/// This is the primary error type used throughout the library.
#[derive(Debug, Error)]
pub enum DeidError {
    /// Invalid threshold, word length, mask character or config file
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A literal matcher could not be built from a candidate string
    #[error("Pattern compilation error for {candidate_len}-character candidate: {reason}")]
    PatternCompilation {
        /// Character length of the rejected candidate
        candidate_len: usize,
        /// Reason reported by the matcher builder
        reason: String,
    },

    /// Document bytes are not valid UTF-8
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// A span does not describe a valid range of the document
    #[error("Invalid span {start}..{end} for document of {len} bytes")]
    InvalidSpan {
        /// Span start (byte offset)
        start: usize,
        /// Span end (byte offset, exclusive)
        end: usize,
        /// Document length in bytes
        len: usize,
    },

    /// Redaction was interrupted by a shutdown request
    #[error("Redaction cancelled by shutdown request")]
    Cancelled,

    /// Batch processing errors
    #[error("Batch error: {0}")]
    Batch(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl DeidError {
    /// Whether this error stems from invalid configuration
    pub fn is_configuration(&self) -> bool {
        matches!(self, DeidError::Configuration(_))
    }
}

impl From<std::io::Error> for DeidError {
    fn from(err: std::io::Error) -> Self {
        DeidError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for DeidError {
    fn from(err: serde_json::Error) -> Self {
        DeidError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for DeidError {
    fn from(err: toml::de::Error) -> Self {
        DeidError::Configuration(format!("TOML parse error: {err}"))
    }
}

impl From<std::str::Utf8Error> for DeidError {
    fn from(err: std::str::Utf8Error) -> Self {
        DeidError::Encoding(format!(
            "invalid UTF-8 sequence after {} valid bytes",
            err.valid_up_to()
        ))
    }
}

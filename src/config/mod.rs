//! Configuration management for deid.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! deid uses TOML configuration files with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `DEID_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation before any document is touched
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use deid::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("deid.toml")?;
//!
//! println!("Threshold: {}", config.redaction.similarity_threshold);
//! println!("Input: {}", config.batch.input_path.display());
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Log level and dry-run mode
//! - [`RedactionConfig`] - Engine parameters
//! - [`BatchConfig`] - Batch input, output and concurrency
//! - [`AuditConfig`] - Audit trail
//! - [`LoggingConfig`] - File logging
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [redaction]
//! similarity_threshold = 0.85
//! min_word_length = 3
//!
//! [batch]
//! input_path = "${DEID_DATA_DIR}/documents.jsonl"
//! terms_path = "${DEID_DATA_DIR}/terms.json"
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use crate::redaction::{AuditConfig, RedactionConfig};
pub use loader::{load_config, load_config_from_str, sample_config};
pub use schema::{ApplicationConfig, BatchConfig, DeidConfig, LoggingConfig};

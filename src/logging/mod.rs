//! Logging and observability
//!
//! This module provides structured logging with support for:
//! - Console output on stderr
//! - JSON-formatted file logs with daily or hourly rotation
//! - Configurable log levels, overridable through `RUST_LOG`
//!
//! Log events carry document keys, counts and lengths. Identifier and
//! document text is never logged.
//!
//! # Example
//!
//! ```no_run
//! use deid::logging::init_logging;
//! use deid::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config)?;
//!
//! tracing::info!("Application started");
//! # Ok::<(), deid::domain::DeidError>(())
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, parse_log_level, LoggingGuard};

/// Log a redacted document
///
/// # Example
///
/// ```no_run
/// use deid::log_document_redacted;
/// use std::time::Duration;
///
/// log_document_redacted!("doc-1", 3, Duration::from_millis(12));
/// ```
#[macro_export]
macro_rules! log_document_redacted {
    ($key:expr, $spans:expr, $duration:expr) => {
        tracing::debug!(
            document_key = %$key,
            spans = $spans,
            duration_ms = $duration.as_millis() as u64,
            "Document redacted"
        );
    };
}

/// Log the completion of a batch run
///
/// # Example
///
/// ```no_run
/// use deid::log_batch_complete;
/// use std::time::Duration;
///
/// log_batch_complete!(42, Duration::from_secs(10));
/// ```
#[macro_export]
macro_rules! log_batch_complete {
    ($count:expr, $duration:expr) => {
        tracing::info!(
            count = $count,
            duration_ms = $duration.as_millis() as u64,
            "Batch completed"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use deid::log_error_with_context;
/// use deid::domain::DeidError;
///
/// let error = DeidError::Configuration("Invalid config".to_string());
/// log_error_with_context!(&error, "Failed to load configuration");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            context = $context,
            "Error occurred"
        );
    };
}

/// Log batch progress
///
/// # Example
///
/// ```no_run
/// use deid::log_batch_progress;
///
/// log_batch_progress!(100, 1000);
/// ```
#[macro_export]
macro_rules! log_batch_progress {
    ($current:expr, $total:expr) => {
        tracing::debug!(
            current = $current,
            total = $total,
            progress_pct = ($current as f64 / ($total as f64).max(1.0) * 100.0),
            "Processing batch"
        );
    };
}

#[cfg(test)]
mod tests {
    use crate::domain::DeidError;
    use std::time::Duration;

    #[test]
    fn test_macros_expand_without_subscriber() {
        log_document_redacted!("doc-1", 2, Duration::from_millis(5));
        log_batch_complete!(10, Duration::from_secs(1));
        log_error_with_context!(&DeidError::Cancelled, "shutdown");
        log_batch_progress!(5, 0);
    }
}

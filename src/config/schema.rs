//! Configuration schema types
//!
//! This module defines the configuration structure for deid.

use crate::redaction::{AuditConfig, RedactionConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main deid configuration
///
/// This is the root configuration structure that maps to the TOML file.
/// Every section is optional and falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeidConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Redaction engine parameters
    #[serde(default)]
    pub redaction: RedactionConfig,

    /// Batch input and output settings
    #[serde(default)]
    pub batch: BatchConfig,

    /// Audit trail settings
    #[serde(default)]
    pub audit: AuditConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl DeidConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.redaction.validate().map_err(|e| e.to_string())?;
        self.batch.validate()?;
        self.audit.validate().map_err(|e| e.to_string())?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Dry run mode (redact and report, write nothing)
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Batch redaction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// JSON Lines file of `{"key", "text"}` documents
    #[serde(default = "default_input_path")]
    pub input_path: PathBuf,

    /// JSON Lines file receiving redacted documents
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// JSON object mapping document keys to identifier lists
    #[serde(default = "default_terms_path")]
    pub terms_path: PathBuf,

    /// Documents redacted concurrently
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Where to write the JSON redaction report, if anywhere
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_path: default_input_path(),
            output_path: default_output_path(),
            terms_path: default_terms_path(),
            max_concurrency: default_max_concurrency(),
            report_path: None,
        }
    }
}

impl BatchConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_concurrency == 0 || self.max_concurrency > 256 {
            return Err(format!(
                "batch.max_concurrency must be between 1 and 256, got {}",
                self.max_concurrency
            ));
        }

        if self.input_path == self.output_path {
            return Err("batch.output_path must differ from batch.input_path".to_string());
        }

        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_input_path() -> PathBuf {
    PathBuf::from("./documents.jsonl")
}

fn default_output_path() -> PathBuf {
    PathBuf::from("./redacted.jsonl")
}

fn default_terms_path() -> PathBuf {
    PathBuf::from("./terms.json")
}

fn default_max_concurrency() -> usize {
    4
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

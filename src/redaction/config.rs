//! Redaction configuration

use crate::domain::{DeidError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Largest accepted `window_slack`
pub const MAX_WINDOW_SLACK: usize = 64;

/// Parameters of a single redaction call
///
/// Immutable for the duration of a call and freely shared between workers.
///
/// # Window neighborhood
///
/// For an identifier of `n` characters the window generator tries window
/// lengths in `[n - k, n + k]` with
/// `k = min(window_slack, floor(n * (1 - similarity_threshold)))`.
/// Lengths further away can never reach the threshold, and `window_slack`
/// caps the per-position work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RedactionConfig {
    /// Minimum normalized similarity (0, 1] for a fuzzy window to be accepted
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f64,

    /// Identifier words of this many characters or fewer are not matched on their own
    #[serde(default = "default_min_word_length")]
    pub min_word_length: usize,

    /// Character written over every redacted character
    #[serde(default = "default_mask_char")]
    pub mask_char: char,

    /// Maximum deviation of window length from identifier length
    #[serde(default = "default_window_slack")]
    pub window_slack: usize,

    /// Identifiers shorter than this are never fuzzily matched
    #[serde(default = "default_fuzzy_min_length")]
    pub fuzzy_min_length: usize,

    /// Fail the whole document when any candidate cannot be compiled
    #[serde(default)]
    pub strict_compilation: bool,
}

fn default_similarity_threshold() -> f64 {
    0.85
}

fn default_min_word_length() -> usize {
    3
}

fn default_mask_char() -> char {
    'X'
}

fn default_window_slack() -> usize {
    2
}

fn default_fuzzy_min_length() -> usize {
    4
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            min_word_length: default_min_word_length(),
            mask_char: default_mask_char(),
            window_slack: default_window_slack(),
            fuzzy_min_length: default_fuzzy_min_length(),
            strict_compilation: false,
        }
    }
}

impl RedactionConfig {
    /// Create a configuration with the given threshold and minimum word length
    pub fn new(similarity_threshold: f64, min_word_length: usize) -> Self {
        Self {
            similarity_threshold,
            min_word_length,
            ..Self::default()
        }
    }

    /// Set the mask character
    pub fn with_mask_char(mut self, mask_char: char) -> Self {
        self.mask_char = mask_char;
        self
    }

    /// Set the window slack
    pub fn with_window_slack(mut self, window_slack: usize) -> Self {
        self.window_slack = window_slack;
        self
    }

    /// Set the fuzzy minimum identifier length
    pub fn with_fuzzy_min_length(mut self, fuzzy_min_length: usize) -> Self {
        self.fuzzy_min_length = fuzzy_min_length;
        self
    }

    /// Require every candidate to compile
    pub fn strict(mut self) -> Self {
        self.strict_compilation = true;
        self
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Configuration`] when the threshold is not a number
    /// in `(0, 1]`, the minimum word length is zero, the mask character is
    /// whitespace or a control character, or the window slack is too large.
    pub fn validate(&self) -> Result<()> {
        let t = self.similarity_threshold;
        if !t.is_finite() || t <= 0.0 || t > 1.0 {
            return Err(DeidError::Configuration(format!(
                "similarity_threshold must be in (0, 1], got {t}"
            )));
        }

        if self.min_word_length == 0 {
            return Err(DeidError::Configuration(
                "min_word_length must be at least 1".to_string(),
            ));
        }

        if self.mask_char.is_whitespace() || self.mask_char.is_control() {
            return Err(DeidError::Configuration(format!(
                "mask_char must be a visible character, got {:?}",
                self.mask_char
            )));
        }

        if self.window_slack > MAX_WINDOW_SLACK {
            return Err(DeidError::Configuration(format!(
                "window_slack must be at most {MAX_WINDOW_SLACK}, got {}",
                self.window_slack
            )));
        }

        Ok(())
    }

    /// Apply `DEID_REDACTION_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DEID_REDACTION_SIMILARITY_THRESHOLD") {
            self.similarity_threshold = parse_env("DEID_REDACTION_SIMILARITY_THRESHOLD", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_REDACTION_MIN_WORD_LENGTH") {
            self.min_word_length = parse_env("DEID_REDACTION_MIN_WORD_LENGTH", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_REDACTION_MASK_CHAR") {
            self.mask_char = parse_env("DEID_REDACTION_MASK_CHAR", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_REDACTION_WINDOW_SLACK") {
            self.window_slack = parse_env("DEID_REDACTION_WINDOW_SLACK", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_REDACTION_FUZZY_MIN_LENGTH") {
            self.fuzzy_min_length = parse_env("DEID_REDACTION_FUZZY_MIN_LENGTH", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_REDACTION_STRICT_COMPILATION") {
            self.strict_compilation = parse_env("DEID_REDACTION_STRICT_COMPILATION", &val)?;
        }

        Ok(())
    }
}

/// Parse an environment override, reporting the variable name on failure
pub(crate) fn parse_env<T: std::str::FromStr>(name: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| DeidError::Configuration(format!("Invalid {name} value: {value}")))
}

/// Audit logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/redaction.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            return Err(DeidError::Configuration(
                "audit.log_path cannot be empty when audit is enabled".to_string(),
            ));
        }
        Ok(())
    }

    /// Apply `DEID_AUDIT_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("DEID_AUDIT_ENABLED") {
            self.enabled = parse_env("DEID_AUDIT_ENABLED", &val)?;
        }

        if let Ok(val) = std::env::var("DEID_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("DEID_AUDIT_JSON_FORMAT") {
            self.json_format = parse_env("DEID_AUDIT_JSON_FORMAT", &val)?;
        }

        Ok(())
    }
}

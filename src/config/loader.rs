//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::DeidConfig;
use crate::domain::errors::DeidError;
use crate::domain::result::Result;
use crate::redaction::config::parse_env;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into DeidConfig
/// 4. Applies environment variable overrides (DEID_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns [`DeidError::Configuration`] if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - An override cannot be parsed
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use deid::config::loader::load_config;
///
/// let config = load_config("deid.toml")?;
/// println!("threshold: {}", config.redaction.similarity_threshold);
/// # Ok::<(), deid::domain::DeidError>(())
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<DeidConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(DeidError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        DeidError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    load_config_from_str(&contents)
}

/// Loads configuration from TOML text
///
/// Same pipeline as [`load_config`] without the file read.
pub fn load_config_from_str(contents: &str) -> Result<DeidConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: DeidConfig = toml::from_str(&contents)
        .map_err(|e| DeidError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        DeidError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched.
///
/// # Errors
///
/// Returns an error listing every referenced environment variable that is not set
pub fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| DeidError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut lines = Vec::new();
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            lines.push(line.to_string());
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        lines.push(processed_line);
    }

    if !missing_vars.is_empty() {
        return Err(DeidError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    let mut result = lines.join("\n");
    if input.ends_with('\n') {
        result.push('\n');
    }
    Ok(result)
}

/// Applies environment variable overrides using DEID_* prefix
///
/// Environment variables follow the pattern: DEID_<SECTION>_<KEY>
/// For example: DEID_REDACTION_SIMILARITY_THRESHOLD, DEID_BATCH_MAX_CONCURRENCY
fn apply_env_overrides(config: &mut DeidConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("DEID_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("DEID_APPLICATION_DRY_RUN") {
        config.application.dry_run = parse_env("DEID_APPLICATION_DRY_RUN", &val)?;
    }

    config.redaction.apply_env_overrides()?;

    // Batch overrides
    if let Ok(val) = std::env::var("DEID_BATCH_INPUT_PATH") {
        config.batch.input_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DEID_BATCH_OUTPUT_PATH") {
        config.batch.output_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DEID_BATCH_TERMS_PATH") {
        config.batch.terms_path = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("DEID_BATCH_MAX_CONCURRENCY") {
        config.batch.max_concurrency = parse_env("DEID_BATCH_MAX_CONCURRENCY", &val)?;
    }
    if let Ok(val) = std::env::var("DEID_BATCH_REPORT_PATH") {
        config.batch.report_path = Some(PathBuf::from(val));
    }

    config.audit.apply_env_overrides()?;

    // Logging overrides
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = parse_env("DEID_LOGGING_LOCAL_ENABLED", &val)?;
    }
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("DEID_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}

/// Sample configuration written by `deid init`
pub fn sample_config() -> String {
    r#"# deid configuration file
# Approximate-match redaction of identifiers in clinical documents

[application]
log_level = "info"
dry_run = false

[redaction]
# Minimum normalized similarity (0, 1] for a fuzzy window to be masked
similarity_threshold = 0.85
# Identifier words of this many characters or fewer are not matched alone
min_word_length = 3
mask_char = "X"
# Maximum difference between window length and identifier length
window_slack = 2
# Identifiers shorter than this are only matched exactly
fuzzy_min_length = 4
# Fail a document when any candidate cannot be compiled
strict_compilation = false

[batch]
input_path = "./documents.jsonl"
output_path = "./redacted.jsonl"
terms_path = "./terms.json"
max_concurrency = 4
# report_path = "./redaction-report.json"

[audit]
enabled = false
log_path = "./audit/redaction.log"
json_format = true

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
    .to_string()
}

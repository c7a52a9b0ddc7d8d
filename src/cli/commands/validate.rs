//! Validate config command implementation
//!
//! This module implements the `validate-config` command for validating
//! the deid configuration file.

use crate::config::load_config;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // Loading validates as well
        let config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                println!("❌ Configuration is invalid");
                println!("   Error: {e}");
                println!();
                return Ok(2);
            }
        };

        println!("✅ Configuration is valid");
        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!(
            "  Similarity Threshold: {}",
            config.redaction.similarity_threshold
        );
        println!("  Min Word Length: {}", config.redaction.min_word_length);
        println!("  Mask Character: {:?}", config.redaction.mask_char);
        println!("  Window Slack: {}", config.redaction.window_slack);
        println!("  Fuzzy Min Length: {}", config.redaction.fuzzy_min_length);
        println!(
            "  Strict Compilation: {}",
            config.redaction.strict_compilation
        );
        println!("  Input: {}", config.batch.input_path.display());
        println!("  Output: {}", config.batch.output_path.display());
        println!("  Terms: {}", config.batch.terms_path.display());
        println!("  Max Concurrency: {}", config.batch.max_concurrency);
        println!(
            "  Audit: {}",
            if config.audit.enabled {
                config.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();
        Ok(0)
    }
}

//! Batch command implementation
//!
//! This module implements the `batch` command for redacting a JSON Lines
//! file of documents using identifiers from a terms file.

use crate::adapters::terms::FileTermSource;
use crate::config::load_config;
use crate::core::batch::{BatchRunner, BatchSummary};
use crate::log_error_with_context;
use crate::redaction::{AuditLogger, RedactionEngine};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;

/// Arguments for the batch command
#[derive(Args, Debug)]
pub struct BatchArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run mode - redact and report without writing output
    #[arg(long)]
    pub dry_run: bool,

    /// Override the input JSON Lines file
    #[arg(long)]
    pub input: Option<PathBuf>,

    /// Override the output JSON Lines file
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Override the terms file
    #[arg(long)]
    pub terms: Option<PathBuf>,

    /// Override the number of documents redacted at once
    #[arg(long)]
    pub max_concurrency: Option<usize>,

    /// Write the JSON redaction report to this file
    #[arg(long)]
    pub report: Option<PathBuf>,
}

impl BatchArgs {
    /// Execute the batch command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting batch command");

        let mut config = match load_config(config_path) {
            Ok(c) => c,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(2);
            }
        };

        // Apply CLI overrides
        if let Some(input) = &self.input {
            tracing::info!(input = %input.display(), "Overriding input path from CLI");
            config.batch.input_path = input.clone();
        }
        if let Some(output) = &self.output {
            tracing::info!(output = %output.display(), "Overriding output path from CLI");
            config.batch.output_path = output.clone();
        }
        if let Some(terms) = &self.terms {
            tracing::info!(terms = %terms.display(), "Overriding terms path from CLI");
            config.batch.terms_path = terms.clone();
        }
        if let Some(max_concurrency) = self.max_concurrency {
            config.batch.max_concurrency = max_concurrency;
        }
        if let Some(report) = &self.report {
            config.batch.report_path = Some(report.clone());
        }
        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }

        if let Err(e) = config.validate() {
            log_error_with_context!(&e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let dry_run = config.application.dry_run;
        if dry_run {
            tracing::info!("Dry run mode enabled - no output will be written");
            println!("🔍 DRY RUN MODE - No output will be written");
            println!();
        }

        // Confirmation prompt (unless --yes or dry-run)
        if !self.yes && !dry_run {
            println!("Batch Configuration:");
            println!("  Input: {}", config.batch.input_path.display());
            println!("  Output: {}", config.batch.output_path.display());
            println!("  Terms: {}", config.batch.terms_path.display());
            println!(
                "  Similarity threshold: {}",
                config.redaction.similarity_threshold
            );
            println!("  Max concurrency: {}", config.batch.max_concurrency);
            println!();
            print!("Proceed with redaction? [y/N]: ");
            use std::io::{self, Write};
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;

            if !input.trim().eq_ignore_ascii_case("y") {
                println!("Redaction cancelled.");
                return Ok(0);
            }
        }

        let mut engine = RedactionEngine::new(config.redaction.clone())?;
        if config.audit.enabled && !dry_run {
            engine = engine.with_audit(AuditLogger::new(
                config.audit.log_path.clone(),
                config.audit.json_format,
            )?);
        }

        let terms = match FileTermSource::load(&config.batch.terms_path).await {
            Ok(t) => t,
            Err(e) => {
                log_error_with_context!(&e, "Failed to load terms");
                eprintln!("Failed to load terms: {e}");
                return Ok(5);
            }
        };

        let mut runner = BatchRunner::new(Arc::new(engine), Arc::new(terms), shutdown_signal)
            .with_max_concurrency(config.batch.max_concurrency);

        let summary = match runner
            .run_files(&config.batch.input_path, &config.batch.output_path, dry_run)
            .await
        {
            Ok(s) => s,
            Err(e) => {
                log_error_with_context!(&e, "Batch failed");
                eprintln!("Batch failed: {e}");
                return Ok(5);
            }
        };

        summary.log_summary();
        print_summary(&summary);

        if dry_run {
            print!("{}", summary.report.format_console());
        }

        if let Some(report_path) = &config.batch.report_path {
            summary.report.write_to_file(report_path)?;
            println!("📄 Report written to {}", report_path.display());
        }

        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &BatchSummary) {
    println!();
    println!("📊 Batch Summary:");
    println!("  Total Documents: {}", summary.total_documents);
    println!("  Redacted: {}", summary.redacted_documents);
    println!("  Failed: {}", summary.failed_documents);
    println!("  Skipped: {}", summary.skipped_documents);
    println!("  Spans Masked: {}", summary.total_spans());
    println!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    println!("  Success Rate: {:.2}%", summary.success_rate());
    println!();

    if !summary.errors.is_empty() {
        println!("⚠️  Errors encountered:");
        for error in &summary.errors {
            println!("  - {}: {}", error.key, error.message);
        }
        println!();
    }
}

/// Exit code for a finished batch
///
/// 130 when interrupted, 1 when some documents failed or had candidates
/// that could not be compiled, 0 otherwise.
pub fn exit_code(summary: &BatchSummary) -> i32 {
    if summary.interrupted {
        println!("⚠️  Batch interrupted gracefully. Unprocessed documents were not written.");
        tracing::info!("Batch interrupted by user signal");
        130
    } else if summary.failed_documents > 0 {
        println!("⚠️  Batch completed with failures");
        1
    } else if summary.report.compilation_failures > 0 {
        println!("⚠️  Batch completed, some documents may be incompletely redacted");
        1
    } else {
        println!("✅ Batch completed successfully!");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::batch::BatchError;
    use crate::domain::DocumentKey;

    #[test]
    fn test_batch_args_defaults() {
        let args = BatchArgs {
            yes: false,
            dry_run: false,
            input: None,
            output: None,
            terms: None,
            max_concurrency: None,
            report: None,
        };

        assert!(!args.yes);
        assert!(!args.dry_run);
        assert!(args.input.is_none());
    }

    #[test]
    fn test_exit_codes() {
        let mut summary = BatchSummary::new(2);
        assert_eq!(exit_code(&summary), 0);

        summary.report.compilation_failures = 1;
        assert_eq!(exit_code(&summary), 1);
        summary.report.compilation_failures = 0;

        summary.add_error(BatchError::new(DocumentKey::new("a").unwrap(), "boom"));
        assert_eq!(exit_code(&summary), 1);

        summary.interrupted = true;
        assert_eq!(exit_code(&summary), 130);
    }
}

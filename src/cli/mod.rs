//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for deid using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// deid - approximate-match redaction of identifiers in clinical text
#[derive(Parser, Debug)]
#[command(name = "deid")]
#[command(version, about, long_about = None)]
#[command(author = "Deid Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "deid.toml", env = "DEID_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "DEID_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Redact a single document
    Redact(commands::redact::RedactArgs),

    /// Redact a JSON Lines file of documents
    Batch(commands::batch::BatchArgs),

    /// Validate configuration file
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_batch() {
        let cli = Cli::parse_from(["deid", "batch"]);
        assert_eq!(cli.config, "deid.toml");
        assert!(matches!(cli.command, Commands::Batch(_)));
    }

    #[test]
    fn test_cli_parse_with_config() {
        let cli = Cli::parse_from(["deid", "--config", "custom.toml", "batch", "--dry-run"]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Batch(args) => assert!(args.dry_run),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["deid", "--log-level", "debug", "validate-config"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_redact() {
        let cli = Cli::parse_from([
            "deid",
            "redact",
            "--input",
            "note.txt",
            "--terms",
            "John Smith,1960-04-12",
            "--threshold",
            "0.8",
        ]);
        match cli.command {
            Commands::Redact(args) => {
                assert_eq!(args.input, "note.txt");
                assert_eq!(args.terms, vec!["John Smith", "1960-04-12"]);
                assert_eq!(args.threshold, Some(0.8));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["deid", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["deid", "init", "--force"]);
        assert!(matches!(cli.command, Commands::Init(_)));
    }
}

//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use crate::config::sample_config;
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "deid.toml")]
    pub output: String,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing deid configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(2);
        }

        match fs::write(&self.output, sample_config()) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Prepare documents as JSON Lines: {{\"key\": ..., \"text\": ...}}");
                println!("  3. Prepare terms as JSON: {{\"<key>\": [\"identifier\", ...]}}");
                println!("  4. Validate configuration: deid validate-config");
                println!("  5. Preview: deid batch --dry-run");
                println!("  6. Run: deid batch");
                println!();
                Ok(0)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {}", e);
                Ok(5)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_init_args_defaults() {
        let args = InitArgs {
            output: "deid.toml".to_string(),
            force: false,
        };
        assert_eq!(args.output, "deid.toml");
        assert!(!args.force);
    }

    #[tokio::test]
    async fn test_init_writes_and_refuses_overwrite() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("deid.toml");
        let args = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: false,
        };

        assert_eq!(args.execute().await.unwrap(), 0);
        assert!(std::fs::read_to_string(&path).unwrap().contains("[redaction]"));

        assert_eq!(args.execute().await.unwrap(), 2);

        let forced = InitArgs {
            output: path.to_string_lossy().to_string(),
            force: true,
        };
        assert_eq!(forced.execute().await.unwrap(), 0);
    }
}

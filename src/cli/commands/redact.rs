//! Redact command implementation
//!
//! This module implements the `redact` command for redacting a single
//! document given on the command line.

use crate::config::{load_config, RedactionConfig};
use crate::domain::{DeidError, Document, DocumentKey};
use crate::log_document_redacted;
use crate::redaction::RedactionEngine;
use clap::Args;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Arguments for the redact command
#[derive(Args, Debug)]
pub struct RedactArgs {
    /// Document to redact, or `-` for stdin
    #[arg(short, long, default_value = "-")]
    pub input: String,

    /// Identifiers to redact (comma-separated)
    #[arg(short, long, value_delimiter = ',')]
    pub terms: Vec<String>,

    /// File with one identifier per line
    #[arg(long)]
    pub terms_file: Option<PathBuf>,

    /// Write the redacted document here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Override the similarity threshold
    #[arg(long)]
    pub threshold: Option<f64>,

    /// Override the minimum word length
    #[arg(long)]
    pub min_word_length: Option<usize>,

    /// Override the mask character
    #[arg(long)]
    pub mask_char: Option<char>,
}

impl RedactArgs {
    /// Execute the redact command
    ///
    /// Uses the `[redaction]` section of the configuration file when it
    /// exists and built-in defaults otherwise.
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let mut config = if Path::new(config_path).exists() {
            match load_config(config_path) {
                Ok(c) => c.redaction,
                Err(e) => {
                    eprintln!("Failed to load configuration: {e}");
                    return Ok(2);
                }
            }
        } else {
            tracing::debug!(config_path = %config_path, "No configuration file, using defaults");
            RedactionConfig::default()
        };

        if let Some(threshold) = self.threshold {
            config.similarity_threshold = threshold;
        }
        if let Some(min_word_length) = self.min_word_length {
            config.min_word_length = min_word_length;
        }
        if let Some(mask_char) = self.mask_char {
            config.mask_char = mask_char;
        }

        let engine = match RedactionEngine::new(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("Invalid redaction settings: {e}");
                return Ok(2);
            }
        };

        let identifiers = match self.collect_terms() {
            Ok(terms) => terms,
            Err(e) => {
                eprintln!("Failed to read terms: {e}");
                return Ok(5);
            }
        };

        let (key, bytes) = match self.read_input() {
            Ok(input) => input,
            Err(e) => {
                eprintln!("Failed to read input: {e}");
                return Ok(5);
            }
        };

        let text = match std::str::from_utf8(&bytes) {
            Ok(text) => text,
            Err(e) => {
                eprintln!("{}", DeidError::from(e));
                return Ok(5);
            }
        };

        let document = Document::new(key, text);
        let outcome = match engine.redact_document(&document, &identifiers) {
            Ok(outcome) => outcome,
            Err(e) => {
                eprintln!("Redaction failed: {e}");
                return Ok(if e.is_configuration() { 2 } else { 5 });
            }
        };

        log_document_redacted!(
            document.key,
            outcome.total_spans(),
            Duration::from_millis(outcome.processing_time_ms)
        );

        match &self.output {
            Some(path) => std::fs::write(path, &outcome.redacted_text)?,
            None => print!("{}", outcome.redacted_text),
        }

        if outcome.is_partial() {
            eprintln!(
                "⚠️  {} candidate(s) could not be compiled; redaction may be incomplete",
                outcome.compilation_failures
            );
            return Ok(1);
        }

        Ok(0)
    }

    fn collect_terms(&self) -> std::io::Result<Vec<String>> {
        let mut terms = self.terms.clone();
        if let Some(path) = &self.terms_file {
            let contents = std::fs::read_to_string(path)?;
            terms.extend(parse_terms(&contents));
        }
        Ok(terms)
    }

    fn read_input(&self) -> anyhow::Result<(DocumentKey, Vec<u8>)> {
        if self.input == "-" {
            let mut bytes = Vec::new();
            std::io::stdin().read_to_end(&mut bytes)?;
            Ok((DocumentKey::new("stdin").map_err(anyhow::Error::msg)?, bytes))
        } else {
            let bytes = std::fs::read(&self.input)?;
            Ok((
                DocumentKey::new(self.input.as_str()).map_err(anyhow::Error::msg)?,
                bytes,
            ))
        }
    }
}

/// One identifier per line; blank lines and `#` comments are skipped
pub fn parse_terms(contents: &str) -> Vec<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_terms() {
        let terms = parse_terms("John Smith\n\n# comment\n  1960-04-12  \n");
        assert_eq!(terms, vec!["John Smith", "1960-04-12"]);
    }

    #[tokio::test]
    async fn test_redact_file_to_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("note.txt");
        let output = dir.path().join("note.redacted.txt");
        std::fs::write(&input, "Patient John Smith was seen on 2020-01-01.").unwrap();

        let args = RedactArgs {
            input: input.to_string_lossy().to_string(),
            terms: vec!["John Smith".to_string()],
            terms_file: None,
            output: Some(output.clone()),
            threshold: Some(1.0),
            min_word_length: Some(3),
            mask_char: None,
        };

        let code = args
            .execute(dir.path().join("missing.toml").to_str().unwrap())
            .await
            .unwrap();
        assert_eq!(code, 0);
        assert_eq!(
            std::fs::read_to_string(output).unwrap(),
            "Patient XXXXXXXXXX was seen on 2020-01-01."
        );
    }

    #[tokio::test]
    async fn test_invalid_threshold_is_configuration_error() {
        let args = RedactArgs {
            input: "-".to_string(),
            terms: vec![],
            terms_file: None,
            output: None,
            threshold: Some(0.0),
            min_word_length: None,
            mask_char: None,
        };
        assert_eq!(args.execute("missing-deid.toml").await.unwrap(), 2);
    }
}

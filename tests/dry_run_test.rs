//! Integration tests for the batch command in dry-run and normal mode

use deid::cli::commands::batch::BatchArgs;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::watch;

/// Lay out a config, documents and terms in a fresh directory
fn setup(audit_enabled: bool) -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    std::fs::write(
        root.join("documents.jsonl"),
        concat!(
            "{\"key\": \"note-1\", \"text\": \"Patient John Smith was seen on 2020-01-01.\"}\n",
            "{\"key\": \"note-2\", \"text\": \"Seen again, nothing to redact.\"}\n",
        ),
    )
    .unwrap();
    std::fs::write(root.join("terms.json"), r#"{"note-1": ["John Smith"]}"#).unwrap();

    let config = format!(
        r#"
[redaction]
similarity_threshold = 1.0
min_word_length = 3

[batch]
input_path = "{root}/documents.jsonl"
output_path = "{root}/redacted.jsonl"
terms_path = "{root}/terms.json"

[audit]
enabled = {audit_enabled}
log_path = "{root}/audit/redaction.log"
"#,
        root = root.display()
    );
    std::fs::write(root.join("deid.toml"), config).unwrap();

    dir
}

fn args(dry_run: bool, report: Option<&Path>) -> BatchArgs {
    BatchArgs {
        yes: true,
        dry_run,
        input: None,
        output: None,
        terms: None,
        max_concurrency: Some(2),
        report: report.map(Path::to_path_buf),
    }
}

fn config_path(dir: &TempDir) -> String {
    dir.path().join("deid.toml").to_string_lossy().to_string()
}

#[tokio::test]
async fn test_dry_run_writes_report_only() {
    let dir = setup(true);
    let report_path = dir.path().join("report.json");
    let (_tx, rx) = watch::channel(false);

    let code = args(true, Some(report_path.as_path()))
        .execute(&config_path(&dir), rx)
        .await
        .unwrap();

    assert_eq!(code, 0);
    assert!(!dir.path().join("redacted.jsonl").exists());
    // Audit is suppressed in dry-run mode
    assert!(!dir.path().join("audit").join("redaction.log").exists());

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(report["total_documents"], 2);
    assert_eq!(report["stats"]["documents_with_redactions"], 1);
    assert_eq!(report["stats"]["documents_without_redactions"], 1);
}

#[tokio::test]
async fn test_batch_writes_output_and_audit() {
    let dir = setup(true);
    let (_tx, rx) = watch::channel(false);

    let code = args(false, None)
        .execute(&config_path(&dir), rx)
        .await
        .unwrap();

    assert_eq!(code, 0);
    let output = std::fs::read_to_string(dir.path().join("redacted.jsonl")).unwrap();
    assert!(output.contains("Patient XXXXXXXXXX was seen on 2020-01-01."));
    assert!(output.contains("Seen again, nothing to redact."));
    assert!(!output.contains("John"));

    let audit = std::fs::read_to_string(dir.path().join("audit").join("redaction.log")).unwrap();
    assert_eq!(audit.lines().count(), 2);
    assert!(!audit.contains("Smith"));
}

#[tokio::test]
async fn test_interrupted_batch_exit_code() {
    let dir = setup(false);
    let (tx, rx) = watch::channel(false);
    tx.send(true).unwrap();

    let code = args(false, None)
        .execute(&config_path(&dir), rx)
        .await
        .unwrap();

    assert_eq!(code, 130);
    let output = std::fs::read_to_string(dir.path().join("redacted.jsonl")).unwrap();
    assert!(output.trim().is_empty());
}

#[tokio::test]
async fn test_missing_config_exit_code() {
    let (_tx, rx) = watch::channel(false);
    let code = args(true, None)
        .execute("/nonexistent/deid.toml", rx)
        .await
        .unwrap();
    assert_eq!(code, 2);
}

#[tokio::test]
async fn test_missing_terms_exit_code() {
    let dir = setup(false);
    std::fs::remove_file(dir.path().join("terms.json")).unwrap();
    let (_tx, rx) = watch::channel(false);

    let code = args(false, None)
        .execute(&config_path(&dir), rx)
        .await
        .unwrap();
    assert_eq!(code, 5);
}

#[tokio::test]
async fn test_invalid_override_exit_code() {
    let dir = setup(false);
    let (_tx, rx) = watch::channel(false);

    let mut batch = args(false, None);
    batch.max_concurrency = Some(0);
    let code = batch.execute(&config_path(&dir), rx).await.unwrap();
    assert_eq!(code, 2);
}

//! Integration tests for batch redaction over JSON Lines files

use async_trait::async_trait;
use deid::adapters::jsonl::{read_documents, write_documents};
use deid::adapters::terms::{FileTermSource, InMemoryTermSource, TermSource};
use deid::core::batch::BatchRunner;
use deid::core::lifecycle::RunnerState;
use deid::domain::{DeidError, Document, DocumentKey, Result};
use deid::redaction::{AuditLogger, RedactionConfig, RedactionEngine};
use std::sync::Arc;
use tempfile::tempdir;
use tokio::sync::watch;

fn key(value: &str) -> DocumentKey {
    DocumentKey::new(value).unwrap()
}

fn engine() -> Arc<RedactionEngine> {
    Arc::new(RedactionEngine::new(RedactionConfig::new(1.0, 3)).unwrap())
}

const DOCUMENTS: &str = r#"{"key": "note-1", "text": "Patient John Smith was seen on 2020-01-01."}
{"key": "note-2", "text": "Jon Smyth attended."}

{"key": "note-3", "text": "No identifiers here."}
"#;

const TERMS: &str = r#"{
  "note-1": ["John Smith"],
  "note-2": ["John Smith"]
}"#;

#[tokio::test]
async fn test_run_files_end_to_end() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("documents.jsonl");
    let output = dir.path().join("out").join("redacted.jsonl");
    let terms_path = dir.path().join("terms.json");
    std::fs::write(&input, DOCUMENTS).unwrap();
    std::fs::write(&terms_path, TERMS).unwrap();

    let terms = FileTermSource::load(&terms_path).await.unwrap();
    let config = RedactionConfig::new(0.8, 3).with_window_slack(1);
    let engine = Arc::new(RedactionEngine::new(config).unwrap());
    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine, Arc::new(terms), rx);

    let summary = runner.run_files(&input, &output, false).await.unwrap();

    assert_eq!(summary.total_documents, 3);
    assert_eq!(summary.redacted_documents, 3);
    assert_eq!(summary.failed_documents, 0);
    assert_eq!(summary.skipped_documents, 0);
    assert!(summary.is_successful());
    assert!(!summary.dry_run);
    assert!(!summary.interrupted);
    assert_eq!(summary.report.stats.documents_with_redactions, 2);
    assert_eq!(summary.report.stats.documents_without_redactions, 1);
    assert_eq!(runner.state(), RunnerState::Stopped);

    let written = read_documents(&output).await.unwrap();
    let texts: Vec<&str> = written.iter().map(|d| d.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Patient XXXXXXXXXX was seen on 2020-01-01.",
            "XXXXXXXXX attended.",
            "No identifiers here.",
        ]
    );
    assert_eq!(written[0].key, key("note-1"));
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("documents.jsonl");
    let output = dir.path().join("redacted.jsonl");
    std::fs::write(&input, DOCUMENTS).unwrap();

    let terms = InMemoryTermSource::new().with_terms(key("note-1"), ["John Smith"]);
    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine(), Arc::new(terms), rx);

    let summary = runner.run_files(&input, &output, true).await.unwrap();

    assert!(summary.dry_run);
    assert_eq!(summary.redacted_documents, 3);
    assert_eq!(summary.total_spans(), summary.report.total_spans);
    assert!(summary.total_spans() >= 1);
    assert!(!output.exists());
}

#[tokio::test]
async fn test_output_keeps_input_order_under_concurrency() {
    let mut terms = InMemoryTermSource::new();
    let mut documents = Vec::new();
    for i in 0..40 {
        let k = key(&format!("note-{i:03}"));
        let name = format!("Patient{i:03}");
        terms.insert(k.clone(), [name.clone()]);
        documents.push(Document::new(k, format!("Seen {name} today, case {i}.")));
    }

    let (_tx, rx) = watch::channel(false);
    let mut runner =
        BatchRunner::new(engine(), Arc::new(terms), rx).with_max_concurrency(8);
    let output = runner.run(documents).await.unwrap();

    assert_eq!(output.documents.len(), 40);
    for (i, document) in output.documents.iter().enumerate() {
        assert_eq!(document.key, key(&format!("note-{i:03}")));
        assert_eq!(document.text, format!("Seen XXXXXXXXXX today, case {i}."));
    }
    assert_eq!(output.summary.total_spans(), 40);
}

struct FlakyTermSource;

#[async_trait]
impl TermSource for FlakyTermSource {
    async fn terms_for(&self, key: &DocumentKey) -> Result<Vec<String>> {
        match key.as_str() {
            "broken" => Err(DeidError::Io("term store unavailable".to_string())),
            _ => Ok(vec!["Alice Jones".to_string()]),
        }
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

#[tokio::test]
async fn test_failed_lookup_is_excluded_and_counted() {
    let documents = vec![
        Document::new(key("first"), "Alice Jones called."),
        Document::new(key("broken"), "Alice Jones called again."),
        Document::new(key("last"), "Nobody called."),
    ];

    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine(), Arc::new(FlakyTermSource), rx);
    let output = runner.run(documents).await.unwrap();

    let keys: Vec<&str> = output.documents.iter().map(|d| d.key.as_str()).collect();
    assert_eq!(keys, vec!["first", "last"]);
    assert_eq!(output.documents[0].text, "XXXXXXXXXXX called.");

    let summary = output.summary;
    assert_eq!(summary.redacted_documents, 2);
    assert_eq!(summary.failed_documents, 1);
    assert!(!summary.is_successful());
    assert_eq!(summary.errors[0].key, key("broken"));
    assert!(summary.errors[0].message.contains("term store unavailable"));
}

#[tokio::test]
async fn test_audit_log_has_no_document_text() {
    let dir = tempdir().unwrap();
    let audit_path = dir.path().join("audit").join("redaction.log");

    let engine = RedactionEngine::new(RedactionConfig::new(1.0, 3))
        .unwrap()
        .with_audit(AuditLogger::new(audit_path.clone(), true).unwrap());
    let terms = InMemoryTermSource::new()
        .with_terms(key("note-1"), ["John Smith"])
        .with_terms(key("note-2"), ["Jane Roe"]);

    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(Arc::new(engine), Arc::new(terms), rx);
    runner
        .run(vec![
            Document::new(key("note-1"), "Patient John Smith was seen."),
            Document::new(key("note-2"), "Patient Jane Roe was seen."),
        ])
        .await
        .unwrap();

    let contents = std::fs::read_to_string(&audit_path).unwrap();
    let entries: Vec<serde_json::Value> = contents
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();

    assert_eq!(entries.len(), 2);
    let mut keys: Vec<&str> = entries
        .iter()
        .map(|e| e["document_key"].as_str().unwrap())
        .collect();
    keys.sort();
    assert_eq!(keys, vec!["note-1", "note-2"]);
    assert!(!contents.contains("John"));
    assert!(!contents.contains("Smith"));
    assert!(!contents.contains("Jane"));
}

#[tokio::test]
async fn test_malformed_input_line_is_reported() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("documents.jsonl");
    std::fs::write(&input, "{\"key\": \"a\", \"text\": \"ok\"}\nnot json\n").unwrap();

    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine(), Arc::new(InMemoryTermSource::new()), rx);
    let err = runner
        .run_files(&input, dir.path().join("out.jsonl"), false)
        .await
        .unwrap_err();

    assert!(matches!(err, DeidError::Serialization(_)));
    assert!(err.to_string().contains(":2:"));
}

#[tokio::test]
async fn test_write_then_read_documents() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("docs.jsonl");
    let documents = vec![
        Document::new(key("a"), "line one\nline two"),
        Document::new(key("b"), "Zoë \"quoted\""),
    ];

    write_documents(&path, &documents).await.unwrap();
    let read = read_documents(&path).await.unwrap();

    assert_eq!(read, documents);
}

#[tokio::test]
async fn test_runner_is_single_use() {
    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine(), Arc::new(InMemoryTermSource::new()), rx);

    runner.run(vec![Document::new(key("a"), "text")]).await.unwrap();
    let err = runner
        .run(vec![Document::new(key("b"), "text")])
        .await
        .unwrap_err();

    assert!(matches!(err, DeidError::Batch(_)));
}

#[tokio::test]
async fn test_empty_batch() {
    let (_tx, rx) = watch::channel(false);
    let mut runner = BatchRunner::new(engine(), Arc::new(InMemoryTermSource::new()), rx);
    let output = runner.run(Vec::new()).await.unwrap();

    assert!(output.documents.is_empty());
    assert_eq!(output.summary.total_documents, 0);
    assert!(output.summary.is_successful());
    assert_eq!(output.summary.success_rate(), 100.0);
}

//! JSON Lines document store
//!
//! One document per line: `{"key": "note-001", "text": "..."}`. Blank lines
//! are ignored.

use crate::domain::{DeidError, Document, Result};
use std::path::Path;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

/// Read every document from a JSON Lines file
///
/// # Errors
///
/// Returns [`DeidError::Io`] if the file cannot be read and
/// [`DeidError::Serialization`] naming the line number of the first
/// malformed record.
pub async fn read_documents(path: impl AsRef<Path>) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let file = tokio::fs::File::open(path).await.map_err(|e| {
        DeidError::Io(format!("Failed to open documents file {}: {e}", path.display()))
    })?;

    let mut lines = BufReader::new(file).lines();
    let mut documents = Vec::new();
    let mut line_number = 0usize;

    while let Some(line) = lines.next_line().await? {
        line_number += 1;
        if line.trim().is_empty() {
            continue;
        }

        let document: Document = serde_json::from_str(&line).map_err(|e| {
            DeidError::Serialization(format!(
                "{}:{line_number}: invalid document record: {e}",
                path.display()
            ))
        })?;
        documents.push(document);
    }

    tracing::debug!(
        path = %path.display(),
        count = documents.len(),
        "Read documents"
    );

    Ok(documents)
}

/// Write documents to a JSON Lines file, replacing any existing content
///
/// The parent directory is created if needed.
pub async fn write_documents(path: impl AsRef<Path>, documents: &[Document]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            tokio::fs::create_dir_all(parent).await?;
        }
    }

    let file = tokio::fs::File::create(path).await.map_err(|e| {
        DeidError::Io(format!("Failed to create output file {}: {e}", path.display()))
    })?;
    let mut writer = BufWriter::new(file);

    for document in documents {
        let mut line = serde_json::to_string(document)?;
        line.push('\n');
        writer.write_all(line.as_bytes()).await?;
    }
    writer.flush().await?;

    tracing::debug!(
        path = %path.display(),
        count = documents.len(),
        "Wrote documents"
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DocumentKey;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("docs.jsonl");
        let documents = vec![
            Document::new(DocumentKey::new("a").unwrap(), "first\nnote"),
            Document::new(DocumentKey::new("b").unwrap(), ""),
        ];

        write_documents(&path, &documents).await.unwrap();
        let read = read_documents(&path).await.unwrap();
        assert_eq!(read, documents);
    }

    #[tokio::test]
    async fn test_blank_lines_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        std::fs::write(&path, "\n{\"key\":\"a\",\"text\":\"x\"}\n\n").unwrap();

        let read = read_documents(&path).await.unwrap();
        assert_eq!(read.len(), 1);
    }

    #[tokio::test]
    async fn test_malformed_line_reports_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("docs.jsonl");
        std::fs::write(&path, "{\"key\":\"a\",\"text\":\"x\"}\n{\"key\":\"\",\"text\":\"y\"}\n").unwrap();

        let err = read_documents(&path).await.unwrap_err();
        assert!(matches!(err, DeidError::Serialization(ref msg) if msg.contains(":2:")));
    }
}

//! Term source backed by a JSON file
//!
//! The file holds one object mapping document keys to identifier lists:
//!
//! ```json
//! {
//!   "note-001": ["John Smith", "1960-04-12"],
//!   "note-002": ["Jane Roe"]
//! }
//! ```

use super::TermSource;
use crate::domain::{DeidError, DocumentKey, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Term source loaded once from a JSON file
#[derive(Clone)]
pub struct FileTermSource {
    path: PathBuf,
    terms: HashMap<String, Vec<String>>,
}

// Terms are identifying; only report sizes.
impl std::fmt::Debug for FileTermSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTermSource")
            .field("path", &self.path)
            .field("keys", &self.terms.len())
            .finish()
    }
}

impl FileTermSource {
    /// Load the term map from `path`
    ///
    /// # Errors
    ///
    /// Returns [`DeidError::Io`] if the file cannot be read and
    /// [`DeidError::Serialization`] if it is not a JSON object of string lists.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
            DeidError::Io(format!("Failed to read terms file {}: {e}", path.display()))
        })?;

        let terms: HashMap<String, Vec<String>> =
            serde_json::from_str(&contents).map_err(|e| {
                DeidError::Serialization(format!(
                    "Invalid terms file {}: {e}",
                    path.display()
                ))
            })?;

        tracing::info!(
            path = %path.display(),
            keys = terms.len(),
            "Loaded identifier terms"
        );

        Ok(Self {
            path: path.to_path_buf(),
            terms,
        })
    }

    /// Number of keys with terms
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Whether the file held no keys
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

#[async_trait]
impl TermSource for FileTermSource {
    async fn terms_for(&self, key: &DocumentKey) -> Result<Vec<String>> {
        Ok(self.terms.get(key.as_str()).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_load_and_lookup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terms.json");
        std::fs::write(&path, r#"{"note-1": ["John Smith", "MRN 1234"], "note-2": []}"#).unwrap();

        let source = FileTermSource::load(&path).await.unwrap();
        assert_eq!(source.len(), 2);

        let terms = source
            .terms_for(&DocumentKey::new("note-1").unwrap())
            .await
            .unwrap();
        assert_eq!(terms, vec!["John Smith", "MRN 1234"]);

        let missing = source
            .terms_for(&DocumentKey::new("note-9").unwrap())
            .await
            .unwrap();
        assert!(missing.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let err = FileTermSource::load("does-not-exist.json").await.unwrap_err();
        assert!(matches!(err, DeidError::Io(_)));
    }

    #[tokio::test]
    async fn test_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terms.json");
        std::fs::write(&path, r#"["not", "a", "map"]"#).unwrap();

        let err = FileTermSource::load(&path).await.unwrap_err();
        assert!(matches!(err, DeidError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_debug_hides_terms() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("terms.json");
        std::fs::write(&path, r#"{"k": ["Jane Roe"]}"#).unwrap();

        let source = FileTermSource::load(&path).await.unwrap();
        assert!(!format!("{source:?}").contains("Jane"));
    }
}

//! Document and document key types
//!
//! A [`Document`] is the immutable clinical text handed to the redaction engine
//! together with an opaque [`DocumentKey`] used to look up its identifiers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque key of a source document
///
/// # Examples
///
/// ```
/// use deid::domain::DocumentKey;
/// use std::str::FromStr;
///
/// let key = DocumentKey::from_str("note-000123").unwrap();
/// assert_eq!(key.as_str(), "note-000123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentKey(String);

impl DocumentKey {
    /// Creates a new key, rejecting blank values
    pub fn new(key: impl Into<String>) -> Result<Self, String> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err("Document key cannot be empty".to_string());
        }
        Ok(Self(key))
    }

    /// Returns the key as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentKey> for String {
    fn from(key: DocumentKey) -> Self {
        key.0
    }
}

impl AsRef<str> for DocumentKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A clinical document
///
/// The text is never mutated; redaction produces a new copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Key used to look up the subject's identifiers
    pub key: DocumentKey,
    /// Free text of the document
    pub text: String,
}

impl Document {
    /// Create a new document
    pub fn new(key: DocumentKey, text: impl Into<String>) -> Self {
        Self {
            key,
            text: text.into(),
        }
    }

    /// Length of the text in characters
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Whether the document has no text
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_key_rejects_blank() {
        assert!(DocumentKey::new("").is_err());
        assert!(DocumentKey::new("   ").is_err());
        assert!(DocumentKey::new("doc-1").is_ok());
    }

    #[test]
    fn test_document_key_serde_roundtrip_validates() {
        let key: DocumentKey = serde_json::from_str("\"doc-7\"").unwrap();
        assert_eq!(key.as_str(), "doc-7");
        assert_eq!(serde_json::to_string(&key).unwrap(), "\"doc-7\"");

        let blank = serde_json::from_str::<DocumentKey>("\"\"");
        assert!(blank.is_err());
    }

    #[test]
    fn test_document_char_len() {
        let doc = Document::new(DocumentKey::new("k").unwrap(), "Zoë Ng");
        assert_eq!(doc.char_len(), 6);
        assert!(!doc.is_empty());
    }
}

//! In-memory term source

use super::TermSource;
use crate::domain::{DocumentKey, Result};
use async_trait::async_trait;
use std::collections::HashMap;

/// Term source held in memory, mainly for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct InMemoryTermSource {
    terms: HashMap<DocumentKey, Vec<String>>,
}

impl InMemoryTermSource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add terms for a key, replacing any previous entry
    pub fn with_terms<I, S>(mut self, key: DocumentKey, terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.insert(key, terms);
        self
    }

    /// Set the terms for a key
    pub fn insert<I, S>(&mut self, key: DocumentKey, terms: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.terms
            .insert(key, terms.into_iter().map(Into::into).collect());
    }
}

#[async_trait]
impl TermSource for InMemoryTermSource {
    async fn terms_for(&self, key: &DocumentKey) -> Result<Vec<String>> {
        Ok(self.terms.get(key).cloned().unwrap_or_default())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

//! Identifier term sources
//!
//! A [`TermSource`] maps a document key to the identifiers known for the
//! document's subject. Keys with no entry yield an empty list, which leaves
//! the document unchanged.

pub mod file;
pub mod memory;

use crate::domain::{DocumentKey, Result};
use async_trait::async_trait;

pub use file::FileTermSource;
pub use memory::InMemoryTermSource;

/// Lookup of identifier terms by document key
#[async_trait]
pub trait TermSource: Send + Sync {
    /// Identifiers for the document's subject
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    async fn terms_for(&self, key: &DocumentKey) -> Result<Vec<String>>;

    /// Short name of the source for logs
    fn name(&self) -> &str;
}

//! Document registry domain model.

use serde::{Deserialize, Serialize};

/// A document the client believes is indexed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    pub filename: String,
}

impl DocumentRecord {
    pub fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
        }
    }
}

/// Ordered log of uploaded documents.
///
/// This is a user-facing log, not a key: the same filename may appear more
/// than once if it was uploaded more than once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRegistry {
    documents: Vec<DocumentRecord>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from its serialized filename sequence.
    pub fn from_filenames<I, S>(filenames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            documents: filenames.into_iter().map(DocumentRecord::new).collect(),
        }
    }

    pub fn documents(&self) -> &[DocumentRecord] {
        &self.documents
    }

    pub fn filenames(&self) -> Vec<String> {
        self.documents.iter().map(|d| d.filename.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Appends a record. Append-only; duplicates are kept.
    pub fn add(mut self, filename: impl Into<String>) -> Self {
        self.documents.push(DocumentRecord::new(filename));
        self
    }

    pub fn clear(mut self) -> Self {
        self.documents.clear();
        self
    }
}

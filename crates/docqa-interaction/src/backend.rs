//! The backend seam.
//!
//! Retrieval, ranking, indexing and answer generation all live behind the
//! HTTP contract; the client only ever sees this trait.

use async_trait::async_trait;
use docqa_core::error::Result;
use docqa_core::upload::UploadFile;
use serde::{Deserialize, Serialize};

/// A backend answer with the passages it was grounded on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryAnswer {
    pub answer: String,
    /// Retrieved passages, in the order the backend ranked them.
    pub context: Vec<String>,
}

/// Operations the document question-answering service offers.
///
/// # Implementation Notes
///
/// Implementations should not retry and should not time out on their own;
/// a stalled call stalls only the operation that issued it.
#[async_trait]
pub trait RagBackend: Send + Sync {
    /// Asks a question against the indexed documents.
    ///
    /// # Arguments
    ///
    /// * `query` - The question, already trimmed
    /// * `k` - How many context passages to retrieve
    async fn query(&self, query: &str, k: u32) -> Result<QueryAnswer>;

    /// Sends a document to be indexed.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The backend confirmed the document was indexed
    /// - `Err(_)`: Transport failure or non-success status
    async fn upload(&self, file: &UploadFile) -> Result<()>;

    /// Drops every indexed document on the backend.
    async fn clear(&self) -> Result<()>;
}

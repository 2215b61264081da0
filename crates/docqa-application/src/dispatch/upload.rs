//! Upload dispatch.

use docqa_core::error::{DocqaError, Result};
use docqa_core::registry::DocumentRegistry;
use docqa_core::session::{Message, SessionState};
use docqa_core::upload::{UploadFile, is_pdf_type};
use docqa_interaction::RagBackend;
use std::sync::Arc;

/// Shown when a non-PDF file is picked.
pub const PDF_ONLY_NOTICE: &str = "Only PDF files are supported.";

/// Shown when the backend did not confirm the upload.
pub const UPLOAD_FAILED_NOTICE: &str = "Failed to upload file.";

pub struct UploadDispatcher {
    backend: Arc<dyn RagBackend>,
}

impl UploadDispatcher {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self { backend }
    }

    /// Local precondition, checked before any network call.
    pub fn validate(declared_type: &str) -> Result<()> {
        if is_pdf_type(declared_type) {
            Ok(())
        } else {
            Err(DocqaError::validation(PDF_ONLY_NOTICE))
        }
    }

    /// Sends the file. Callers must have validated it first.
    pub async fn execute(&self, file: &UploadFile) -> Result<()> {
        tracing::info!("[UploadDispatcher] Uploading {}", file.filename);
        self.backend.upload(file).await.inspect_err(|e| {
            tracing::warn!("[UploadDispatcher] Upload of {} failed: {}", file.filename, e);
        })
    }

    /// State after a confirmed upload: the filename is appended to the
    /// registry and an informational message to the timeline.
    pub fn confirm(
        registry: DocumentRegistry,
        state: SessionState,
        filename: &str,
    ) -> (DocumentRegistry, SessionState) {
        (
            registry.add(filename),
            state.append_message(Message::upload_confirmation(filename)),
        )
    }
}

//! File selection for uploads.

use docqa_core::error::{DocqaError, Result};
use docqa_core::upload::{UploadFile, is_pdf_type};
use std::path::{Path, PathBuf};

/// Infers the declared MIME type of a path from its extension.
fn infer_mime_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .to_string()
}

/// A file the user picked for upload, not yet read.
///
/// Built fresh for every attempt, so picking the same path again after a
/// success or failure is always possible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadSelection {
    path: PathBuf,
    filename: String,
    declared_type: String,
}

impl UploadSelection {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| {
                DocqaError::validation(format!("Not a file path: {}", path.display()))
            })?;

        Ok(Self {
            path: path.to_path_buf(),
            filename,
            declared_type: infer_mime_type(path),
        })
    }

    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn declared_type(&self) -> &str {
        &self.declared_type
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_type(&self.declared_type)
    }

    /// Reads the file contents.
    pub async fn read(self) -> Result<UploadFile> {
        let contents = tokio::fs::read(&self.path).await?;
        Ok(UploadFile::new(self.filename, self.declared_type, contents))
    }
}

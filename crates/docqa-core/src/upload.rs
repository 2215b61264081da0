//! Upload payload types.

/// The only declared type the backend accepts.
pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A document ready to be sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    /// Name sent in the multipart form and recorded in the registry.
    pub filename: String,
    /// MIME type the file declares.
    pub declared_type: String,
    pub contents: Vec<u8>,
}

impl UploadFile {
    pub fn new(
        filename: impl Into<String>,
        declared_type: impl Into<String>,
        contents: Vec<u8>,
    ) -> Self {
        Self {
            filename: filename.into(),
            declared_type: declared_type.into(),
            contents,
        }
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf_type(&self.declared_type)
    }
}

/// True when a declared MIME type indicates PDF.
pub fn is_pdf_type(declared_type: &str) -> bool {
    declared_type.eq_ignore_ascii_case(PDF_MIME_TYPE)
}

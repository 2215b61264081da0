//! Dispatchers: the only places backend side effects happen.
//!
//! Each dispatcher pairs an async `execute` with pure transition functions;
//! `SessionController` applies the transitions to the shared state.

pub mod clear;
pub mod query;
pub mod upload;

pub use clear::{CLEAR_FAILED_NOTICE, ClearDispatcher};
pub use query::{QueryDispatcher, QueryReply, SendRejection};
pub use upload::{PDF_ONLY_NOTICE, UPLOAD_FAILED_NOTICE, UploadDispatcher};

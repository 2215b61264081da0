//! Backend access for the DocQA client.

pub mod backend;
pub mod http_backend;

pub use backend::{QueryAnswer, RagBackend};
pub use http_backend::HttpRagBackend;

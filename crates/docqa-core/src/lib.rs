pub mod citation;
pub mod config;
pub mod error;
pub mod registry;
pub mod session;
pub mod upload;

// Re-export common error type
pub use error::DocqaError;

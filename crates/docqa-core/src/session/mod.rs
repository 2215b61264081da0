//! Session domain module.
//!
//! # Module Structure
//!
//! - `message`: Timeline entries (`Message`, `MessageRole`) and synthetic texts
//! - `state`: The timeline snapshot and its pure transitions (`SessionState`)
//!
//! # Usage
//!
//! ```ignore
//! use docqa_core::session::{Message, SessionState};
//!
//! let state = SessionState::initial().append_message(Message::user("What is RAG?"));
//! ```

mod message;
mod state;

// Re-export public API
pub use message::{
    Message, MessageRole, QUERY_FALLBACK_TEXT, RESET_TEXT, WELCOME_TEXT,
};
pub use state::SessionState;

//! Conversation message types.
//!
//! This module contains types for representing messages in the session
//! timeline, including roles, citations and the client's synthetic texts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Greeting placed in every fresh session.
pub const WELCOME_TEXT: &str = "Hello! I am your Research AI Assistant. Upload a PDF document using the sidebar to get started, or ask me questions about already uploaded documents.";

/// Sole message left after a confirmed clear.
pub const RESET_TEXT: &str =
    "Document history cleared. Please upload new documents to continue.";

/// Assistant reply used when a query fails for any reason.
pub const QUERY_FALLBACK_TEXT: &str =
    "I'm sorry, I encountered an error while processing your request. Please try again.";

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Message typed by the user.
    User,
    /// Message from the assistant, either backend-derived or synthetic.
    Assistant,
}

/// A single entry in the session timeline.
///
/// `citations` is only ever `Some` on assistant messages built from a
/// backend answer; it holds the returned context passages verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Opaque unique token. An empty id is filled in on append.
    pub id: String,
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message (markdown for assistant answers).
    pub content: String,
    /// Context passages returned with an answer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citations: Option<Vec<String>>,
    /// When the message was created.
    pub timestamp: DateTime<Utc>,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            id: fresh_id(),
            role,
            content: content.into(),
            citations: None,
            timestamp: Utc::now(),
        }
    }

    /// A user turn carrying the raw input text.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// An assistant message without citations.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// An assistant message built from a backend answer.
    ///
    /// The context passages are stored as given: no reordering, no
    /// deduplication, no truncation.
    pub fn answer(content: impl Into<String>, context: Vec<String>) -> Self {
        Self {
            citations: Some(context),
            ..Self::new(MessageRole::Assistant, content)
        }
    }

    pub fn welcome() -> Self {
        Self::assistant(WELCOME_TEXT)
    }

    pub fn reset_notice() -> Self {
        Self::assistant(RESET_TEXT)
    }

    pub fn query_fallback() -> Self {
        Self::assistant(QUERY_FALLBACK_TEXT)
    }

    /// Informational message announcing a successfully indexed document.
    pub fn upload_confirmation(filename: &str) -> Self {
        Self::assistant(format!(
            "I've successfully indexed \"{filename}\". You can now ask questions about its content."
        ))
    }

    /// True when this message has at least one citation to disclose.
    pub fn has_citations(&self) -> bool {
        self.role == MessageRole::Assistant
            && self.citations.as_ref().is_some_and(|c| !c.is_empty())
    }
}

pub(crate) fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

//! Query dispatch under single-flight discipline.
//!
//! A send is split into three parts so each can be exercised without timing:
//! [`QueryDispatcher::begin`] (pure, steps 1-2), [`QueryDispatcher::execute`]
//! (the backend call, never fails) and [`QueryDispatcher::settle`] (pure,
//! append reply then clear the pending flag).

use docqa_core::session::{Message, SessionState};
use docqa_interaction::RagBackend;
use std::fmt;
use std::sync::Arc;

/// Why a send was refused before anything happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendRejection {
    /// Input was empty after trimming whitespace.
    Empty,
    /// Another query is still in flight.
    Pending,
}

impl fmt::Display for SendRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SendRejection::Empty => write!(f, "Please type a question first."),
            SendRejection::Pending => write!(f, "Still analyzing the previous question."),
        }
    }
}

/// The assistant message a query produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryReply {
    /// Backend answer with its context passages.
    Answer(Message),
    /// Fixed fallback after any failure.
    Fallback(Message),
}

impl QueryReply {
    pub fn message(&self) -> &Message {
        match self {
            QueryReply::Answer(m) | QueryReply::Fallback(m) => m,
        }
    }
}

pub struct QueryDispatcher {
    backend: Arc<dyn RagBackend>,
    top_k: u32,
}

impl QueryDispatcher {
    pub fn new(backend: Arc<dyn RagBackend>, top_k: u32) -> Self {
        Self { backend, top_k }
    }

    /// Appends the user message with the raw input and marks the session
    /// pending. Returns the next state and the trimmed query to send.
    pub fn begin(
        state: &SessionState,
        input: &str,
    ) -> Result<(SessionState, String), SendRejection> {
        let query = input.trim();
        if query.is_empty() {
            return Err(SendRejection::Empty);
        }
        if state.query_pending() {
            return Err(SendRejection::Pending);
        }

        let next = state
            .clone()
            .append_message(Message::user(input))
            .set_pending(true);
        Ok((next, query.to_string()))
    }

    /// Issues the backend call.
    ///
    /// Every failure (transport, status, undecodable body) becomes the
    /// fallback message; nothing escapes to the caller.
    pub async fn execute(&self, query: &str) -> QueryReply {
        match self.backend.query(query, self.top_k).await {
            Ok(answer) => {
                tracing::debug!(
                    "[QueryDispatcher] Answer received with {} context passage(s)",
                    answer.context.len()
                );
                QueryReply::Answer(Message::answer(answer.answer, answer.context))
            }
            Err(e) => {
                tracing::warn!("[QueryDispatcher] Query failed: {}", e);
                QueryReply::Fallback(Message::query_fallback())
            }
        }
    }

    /// Appends the reply, then clears the pending flag as the final step.
    pub fn settle(state: SessionState, reply: Message) -> SessionState {
        state.append_message(reply).set_pending(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::session::MessageRole;

    #[test]
    fn test_begin_appends_raw_input_and_sets_pending() {
        let state = SessionState::initial();
        let (next, query) = QueryDispatcher::begin(&state, "  what is k?  ").unwrap();

        assert_eq!(query, "what is k?");
        assert!(next.query_pending());
        assert_eq!(next.len(), 2);

        let user = next.last().unwrap();
        assert_eq!(user.role, MessageRole::User);
        assert_eq!(user.content, "  what is k?  ");
    }

    #[test]
    fn test_begin_rejects_blank_input() {
        let state = SessionState::initial();
        assert_eq!(
            QueryDispatcher::begin(&state, " \t\n"),
            Err(SendRejection::Empty)
        );
    }

    #[test]
    fn test_begin_rejects_while_pending() {
        let state = SessionState::initial().set_pending(true);
        assert_eq!(
            QueryDispatcher::begin(&state, "second question"),
            Err(SendRejection::Pending)
        );
    }

    #[test]
    fn test_settle_appends_then_clears_pending() {
        let (pending, _) = QueryDispatcher::begin(&SessionState::initial(), "q").unwrap();
        let settled = QueryDispatcher::settle(pending, Message::assistant("a"));

        assert!(!settled.query_pending());
        assert_eq!(settled.len(), 3);
        assert_eq!(settled.last().unwrap().content, "a");
    }
}

//! Session timeline state.
//!
//! `SessionState` is an immutable snapshot; every transition consumes the
//! current snapshot and returns the next one. Callers persist or render the
//! result as a separate concern.

use super::message::{Message, fresh_id};
use serde::{Deserialize, Serialize};

/// The ordered message timeline plus the "query in flight" flag.
///
/// Insertion order is display order is chronological order. No transition
/// removes or reorders existing messages; only [`SessionState::reset`]
/// replaces the timeline wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    messages: Vec<Message>,
    query_pending: bool,
}

impl SessionState {
    /// A fresh session holding the synthetic welcome message.
    pub fn initial() -> Self {
        Self {
            messages: vec![Message::welcome()],
            query_pending: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn query_pending(&self) -> bool {
        self.query_pending
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Looks up a message by id.
    pub fn find(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Appends a message at the end of the timeline.
    ///
    /// A missing (empty) or already used id is replaced with a fresh one so
    /// ids stay unique within the session.
    pub fn append_message(mut self, mut message: Message) -> Self {
        if message.id.is_empty() || self.find(&message.id).is_some() {
            message.id = fresh_id();
        }
        self.messages.push(message);
        self
    }

    /// Replaces the timeline with exactly one freshly generated reset notice.
    ///
    /// The pending flag is left as is; a clear never races an outstanding
    /// query's own settle step.
    pub fn reset(mut self) -> Self {
        self.messages = vec![Message::reset_notice()];
        self
    }

    pub fn set_pending(mut self, pending: bool) -> Self {
        self.query_pending = pending;
        self
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::initial()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::message::{MessageRole, RESET_TEXT, WELCOME_TEXT};

    #[test]
    fn test_initial_state() {
        let state = SessionState::initial();
        assert_eq!(state.len(), 1);
        assert!(!state.query_pending());

        let welcome = &state.messages()[0];
        assert_eq!(welcome.role, MessageRole::Assistant);
        assert_eq!(welcome.content, WELCOME_TEXT);
    }

    #[test]
    fn test_append_preserves_order() {
        let state = SessionState::initial()
            .append_message(Message::user("first"))
            .append_message(Message::assistant("second"))
            .append_message(Message::user("third"));

        let contents: Vec<&str> = state.messages().iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec![WELCOME_TEXT, "first", "second", "third"]);
    }

    #[test]
    fn test_append_assigns_missing_id() {
        let mut message = Message::user("no id");
        message.id = String::new();

        let state = SessionState::initial().append_message(message);
        assert!(!state.last().unwrap().id.is_empty());
    }

    #[test]
    fn test_append_replaces_duplicate_id() {
        let first = Message::user("a");
        let mut second = Message::user("b");
        second.id = first.id.clone();

        let state = SessionState::initial()
            .append_message(first.clone())
            .append_message(second);

        assert_eq!(state.messages()[1].id, first.id);
        assert_ne!(state.messages()[2].id, first.id);
    }

    #[test]
    fn test_reset_leaves_single_fresh_notice() {
        let before = SessionState::initial()
            .append_message(Message::user("q"))
            .append_message(Message::answer("a", vec!["c".into()]));
        let old_ids: Vec<String> = before.messages().iter().map(|m| m.id.clone()).collect();

        let after = before.reset();
        assert_eq!(after.len(), 1);

        let notice = &after.messages()[0];
        assert_eq!(notice.role, MessageRole::Assistant);
        assert_eq!(notice.content, RESET_TEXT);
        assert!(!old_ids.contains(&notice.id));
    }

    #[test]
    fn test_reset_generates_new_message_each_time() {
        let first = SessionState::initial().reset();
        let second = first.clone().reset();
        assert_ne!(first.messages()[0].id, second.messages()[0].id);
    }

    #[test]
    fn test_set_pending() {
        let state = SessionState::initial().set_pending(true);
        assert!(state.query_pending());
        assert_eq!(state.len(), 1);

        let state = state.set_pending(false);
        assert!(!state.query_pending());
    }
}

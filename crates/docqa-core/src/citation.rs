//! Per-message citation disclosure.
//!
//! Each assistant message with citations can be expanded or collapsed
//! independently. The flags live only for the current session and are never
//! persisted; every message starts collapsed.

use crate::session::Message;
use std::collections::HashSet;

/// Default display budget per citation, in characters.
pub const DEFAULT_CITATION_BUDGET: usize = 200;

/// Appended to a citation cut at the budget.
pub const TRUNCATION_MARKER: &str = "...";

/// Session-only set of expanded messages, keyed by message id.
#[derive(Debug, Clone, Default)]
pub struct CitationDisclosure {
    expanded: HashSet<String>,
}

impl CitationDisclosure {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, message_id: &str) -> bool {
        self.expanded.contains(message_id)
    }

    /// Flips the flag for `message` and returns the new state.
    ///
    /// Messages without citations have nothing to disclose and always stay
    /// collapsed.
    pub fn toggle(&mut self, message: &Message) -> bool {
        if !message.has_citations() {
            return false;
        }
        if self.expanded.remove(&message.id) {
            false
        } else {
            self.expanded.insert(message.id.clone());
            true
        }
    }

    /// Collapses everything.
    pub fn reset(&mut self) {
        self.expanded.clear();
    }
}

/// Display lines for the citations of `message`, if expanded.
///
/// Returns `None` when the message is collapsed or has no citations.
pub fn disclosed_citations(
    disclosure: &CitationDisclosure,
    message: &Message,
    budget: usize,
) -> Option<Vec<String>> {
    if !message.has_citations() || !disclosure.is_expanded(&message.id) {
        return None;
    }
    message
        .citations
        .as_ref()
        .map(|c| c.iter().map(|text| truncate_citation(text, budget)).collect())
}

/// Caps a citation at `budget` characters.
///
/// Surrounding whitespace is trimmed first. The cut is a plain character
/// count (Unicode scalar values): it is not word-boundary aware and may split
/// a word in half. Text within the budget is returned unchanged.
pub fn truncate_citation(text: &str, budget: usize) -> String {
    let text = text.trim();
    match text.char_indices().nth(budget) {
        Some((cut, _)) => format!("{}{}", &text[..cut], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

//! Clear dispatch.

use docqa_core::error::Result;
use docqa_core::registry::DocumentRegistry;
use docqa_core::session::SessionState;
use docqa_interaction::RagBackend;
use std::sync::Arc;

/// Shown when the backend did not confirm the clear.
pub const CLEAR_FAILED_NOTICE: &str = "Failed to clear document history.";

pub struct ClearDispatcher {
    backend: Arc<dyn RagBackend>,
}

impl ClearDispatcher {
    pub fn new(backend: Arc<dyn RagBackend>) -> Self {
        Self { backend }
    }

    pub async fn execute(&self) -> Result<()> {
        tracing::info!("[ClearDispatcher] Clearing backend index");
        self.backend.clear().await.inspect_err(|e| {
            tracing::warn!("[ClearDispatcher] Clear failed, keeping local state: {}", e);
        })
    }

    /// State after a confirmed clear: empty registry, single reset notice.
    pub fn apply(
        registry: DocumentRegistry,
        state: SessionState,
    ) -> (DocumentRegistry, SessionState) {
        (registry.clear(), state.reset())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docqa_core::session::{Message, RESET_TEXT};

    #[test]
    fn test_apply() {
        let state = SessionState::initial().append_message(Message::user("q"));
        let registry = DocumentRegistry::from_filenames(["a.pdf"]);

        let (registry, state) = ClearDispatcher::apply(registry, state);
        assert!(registry.is_empty());
        assert_eq!(state.len(), 1);
        assert_eq!(state.messages()[0].content, RESET_TEXT);
    }
}

//! Session controller.
//!
//! Wires user intents (send, upload, clear) to the dispatchers and owns the
//! shared state they advance. The presentation layer only reads snapshots.

use crate::dispatch::{
    CLEAR_FAILED_NOTICE, ClearDispatcher, PDF_ONLY_NOTICE, QueryDispatcher, QueryReply,
    SendRejection, UPLOAD_FAILED_NOTICE, UploadDispatcher,
};
use crate::selection::UploadSelection;
use docqa_core::citation::{CitationDisclosure, disclosed_citations};
use docqa_core::config::ClientConfig;
use docqa_core::error::DocqaError;
use docqa_core::registry::{DocumentRegistry, KeyValueStore, RegistryMirror};
use docqa_core::session::{Message, SessionState};
use docqa_core::upload::UploadFile;
use docqa_interaction::RagBackend;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Result of a send intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The backend answered; the assistant message is in the timeline.
    Answered(Message),
    /// The query failed; the fallback message is in the timeline.
    Failed(Message),
    /// Nothing was sent and nothing was appended.
    Rejected(SendRejection),
}

/// Result of an upload intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The backend indexed the file; registry and timeline were updated.
    Indexed { filename: String },
    /// Rejected locally; no backend call was made.
    Rejected { notice: String },
    /// Another upload is still in flight; no backend call was made.
    Busy,
    /// The upload did not go through; registry unchanged.
    Failed { notice: String, error: DocqaError },
}

/// Result of a clear intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The backend confirmed; registry, mirror and timeline were reset.
    Cleared,
    /// The backend did not confirm; local state untouched.
    Failed { notice: String, error: DocqaError },
}

/// Clears the upload flag when an upload attempt ends, however it ends.
struct UploadGuard<'a>(&'a AtomicBool);

impl Drop for UploadGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Settles an abandoned query with the fallback message.
///
/// Armed once a query is marked pending. If the send future is dropped
/// before it settles (timeout, `select!`, aborted task) the pending flag
/// would otherwise stay set for the rest of the session.
struct PendingQuery {
    session: Arc<RwLock<SessionState>>,
    armed: bool,
}

impl PendingQuery {
    fn new(session: Arc<RwLock<SessionState>>) -> Self {
        Self {
            session,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }

    fn abandon(state: &mut SessionState) {
        let current = std::mem::take(state);
        *state = QueryDispatcher::settle(current, Message::query_fallback());
    }
}

impl Drop for PendingQuery {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        tracing::warn!("[SessionController] Query abandoned before it settled");

        match self.session.try_write() {
            Ok(mut state) => Self::abandon(&mut state),
            Err(_) => {
                // Lock is busy; settle as soon as it frees up
                let session = Arc::clone(&self.session);
                match tokio::runtime::Handle::try_current() {
                    Ok(handle) => {
                        handle.spawn(async move {
                            Self::abandon(&mut *session.write().await);
                        });
                    }
                    Err(_) => {
                        tracing::error!(
                            "[SessionController] No runtime to settle abandoned query"
                        );
                    }
                }
            }
        }
    }
}

/// Orchestrates the session timeline, the document registry and citation
/// disclosure.
///
/// `SessionState` and `DocumentRegistry` are only ever replaced here, with
/// the next snapshot computed by a dispatcher's transition function.
pub struct SessionController {
    session: Arc<RwLock<SessionState>>,
    registry: RwLock<DocumentRegistry>,
    disclosure: RwLock<CitationDisclosure>,
    mirror: RegistryMirror,
    queries: QueryDispatcher,
    uploads: UploadDispatcher,
    clears: ClearDispatcher,
    upload_in_flight: AtomicBool,
    citation_budget: usize,
}

impl SessionController {
    /// Creates a controller with a fresh timeline and the registry read back
    /// from `store`.
    pub fn new(
        backend: Arc<dyn RagBackend>,
        store: Arc<dyn KeyValueStore>,
        config: &ClientConfig,
    ) -> Self {
        let mirror = RegistryMirror::new(store);
        let registry = mirror.load();
        tracing::info!(
            "[SessionController] Starting session with {} known document(s)",
            registry.len()
        );

        Self {
            session: Arc::new(RwLock::new(SessionState::initial())),
            registry: RwLock::new(registry),
            disclosure: RwLock::new(CitationDisclosure::new()),
            mirror,
            queries: QueryDispatcher::new(backend.clone(), config.top_k),
            uploads: UploadDispatcher::new(backend.clone()),
            clears: ClearDispatcher::new(backend),
            upload_in_flight: AtomicBool::new(false),
            citation_budget: config.citation_budget,
        }
    }

    // ============================================================================
    // Read side
    // ============================================================================

    pub async fn snapshot(&self) -> SessionState {
        self.session.read().await.clone()
    }

    pub async fn documents(&self) -> DocumentRegistry {
        self.registry.read().await.clone()
    }

    pub async fn is_query_pending(&self) -> bool {
        self.session.read().await.query_pending()
    }

    pub fn is_upload_in_flight(&self) -> bool {
        self.upload_in_flight.load(Ordering::Acquire)
    }

    /// Truncated citations of `message` if it is currently expanded.
    pub async fn visible_citations(&self, message: &Message) -> Option<Vec<String>> {
        let disclosure = self.disclosure.read().await;
        disclosed_citations(&disclosure, message, self.citation_budget)
    }

    // ============================================================================
    // Intents
    // ============================================================================

    /// Sends a question.
    ///
    /// The pending check and the pending mark happen under one write lock,
    /// so two concurrent sends can never both reach the backend. Dropping
    /// the returned future before it completes settles the query with the
    /// fallback message.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let query = {
            let mut session = self.session.write().await;
            match QueryDispatcher::begin(&session, input) {
                Ok((next, query)) => {
                    *session = next;
                    query
                }
                Err(rejection) => {
                    tracing::debug!("[SessionController] Send rejected: {:?}", rejection);
                    return SendOutcome::Rejected(rejection);
                }
            }
        };

        let pending = PendingQuery::new(Arc::clone(&self.session));
        let reply = self.queries.execute(&query).await;

        {
            let mut session = self.session.write().await;
            let current = std::mem::take(&mut *session);
            *session = QueryDispatcher::settle(current, reply.message().clone());
            pending.disarm();
        }

        match reply {
            QueryReply::Answer(message) => SendOutcome::Answered(message),
            QueryReply::Fallback(message) => SendOutcome::Failed(message),
        }
    }

    /// Uploads the file at `path`.
    ///
    /// The declared type is checked from the path before the file is read.
    pub async fn upload_path(&self, path: impl AsRef<Path>) -> UploadOutcome {
        let selection = match UploadSelection::from_path(path) {
            Ok(selection) => selection,
            Err(e) => {
                return UploadOutcome::Rejected {
                    notice: e.to_string(),
                };
            }
        };
        if let Some(rejected) = Self::reject_non_pdf(selection.declared_type()) {
            return rejected;
        }

        let Some(_guard) = self.claim_upload() else {
            return UploadOutcome::Busy;
        };

        let file = match selection.read().await {
            Ok(file) => file,
            Err(error) => {
                tracing::warn!("[SessionController] Could not read upload: {}", error);
                return UploadOutcome::Failed {
                    notice: UPLOAD_FAILED_NOTICE.to_string(),
                    error,
                };
            }
        };

        self.upload_claimed(file).await
    }

    /// Uploads an in-memory file.
    pub async fn upload(&self, file: UploadFile) -> UploadOutcome {
        if let Some(rejected) = Self::reject_non_pdf(&file.declared_type) {
            return rejected;
        }
        let Some(_guard) = self.claim_upload() else {
            return UploadOutcome::Busy;
        };
        self.upload_claimed(file).await
    }

    /// Clears the backend index, then local state if the backend confirmed.
    pub async fn clear(&self) -> ClearOutcome {
        if let Err(error) = self.clears.execute().await {
            return ClearOutcome::Failed {
                notice: CLEAR_FAILED_NOTICE.to_string(),
                error,
            };
        }

        {
            let mut registry = self.registry.write().await;
            let mut session = self.session.write().await;
            let (next_registry, next_session) = ClearDispatcher::apply(
                std::mem::take(&mut *registry),
                std::mem::take(&mut *session),
            );
            *registry = next_registry;
            *session = next_session;
        }

        if let Err(e) = self.mirror.clear() {
            tracing::error!("[SessionController] Failed to clear registry mirror: {}", e);
        }
        self.disclosure.write().await.reset();

        tracing::info!("[SessionController] Session cleared");
        ClearOutcome::Cleared
    }

    /// Flips citation disclosure for the message with `message_id`.
    ///
    /// Returns the new expanded state, or `None` if no such message exists.
    pub async fn toggle_citations(&self, message_id: &str) -> Option<bool> {
        let session = self.session.read().await;
        let message = session.find(message_id)?;
        Some(self.disclosure.write().await.toggle(message))
    }

    // ============================================================================
    // Upload helpers
    // ============================================================================

    fn reject_non_pdf(declared_type: &str) -> Option<UploadOutcome> {
        UploadDispatcher::validate(declared_type).err().map(|_| {
            tracing::debug!(
                "[SessionController] Rejected upload with declared type {}",
                declared_type
            );
            UploadOutcome::Rejected {
                notice: PDF_ONLY_NOTICE.to_string(),
            }
        })
    }

    fn claim_upload(&self) -> Option<UploadGuard<'_>> {
        self.upload_in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| UploadGuard(&self.upload_in_flight))
    }

    async fn upload_claimed(&self, file: UploadFile) -> UploadOutcome {
        if let Err(error) = self.uploads.execute(&file).await {
            return UploadOutcome::Failed {
                notice: UPLOAD_FAILED_NOTICE.to_string(),
                error,
            };
        }

        let confirmed = {
            let mut registry = self.registry.write().await;
            let mut session = self.session.write().await;
            let (next_registry, next_session) = UploadDispatcher::confirm(
                std::mem::take(&mut *registry),
                std::mem::take(&mut *session),
                &file.filename,
            );
            *registry = next_registry;
            *session = next_session;
            registry.clone()
        };

        // Store I/O runs outside the state locks
        if let Err(e) = self.mirror.persist(&confirmed) {
            tracing::error!("[SessionController] Failed to write registry mirror: {}", e);
        }

        tracing::info!("[SessionController] Indexed {}", file.filename);
        UploadOutcome::Indexed {
            filename: file.filename,
        }
    }
}

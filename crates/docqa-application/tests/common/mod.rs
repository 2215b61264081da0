#![allow(dead_code)]

use async_trait::async_trait;
use docqa_application::SessionController;
use docqa_core::config::ClientConfig;
use docqa_core::error::{DocqaError, Result};
use docqa_core::registry::KeyValueStore;
use docqa_core::upload::UploadFile;
use docqa_infrastructure::MemoryKeyValueStore;
use docqa_interaction::{QueryAnswer, RagBackend};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Holds a call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

// Mock RagBackend for testing
#[derive(Default)]
pub struct MockBackend {
    pub query_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    pub clear_calls: AtomicUsize,
    pub queries: Mutex<Vec<(String, u32)>>,
    pub uploaded: Mutex<Vec<String>>,
    pub answer: Mutex<Option<QueryAnswer>>,
    pub fail_query: Mutex<bool>,
    pub fail_upload: Mutex<bool>,
    pub fail_clear: Mutex<bool>,
    pub query_gate: Option<Arc<Gate>>,
    pub upload_gate: Option<Arc<Gate>>,
}

impl MockBackend {
    pub fn answering(answer: &str, context: &[&str]) -> Self {
        Self {
            answer: Mutex::new(Some(QueryAnswer {
                answer: answer.to_string(),
                context: context.iter().map(|c| c.to_string()).collect(),
            })),
            ..Self::default()
        }
    }

    pub fn with_query_gate(mut self, gate: Arc<Gate>) -> Self {
        self.query_gate = Some(gate);
        self
    }

    pub fn with_upload_gate(mut self, gate: Arc<Gate>) -> Self {
        self.upload_gate = Some(gate);
        self
    }

    pub fn failing_queries(self) -> Self {
        *self.fail_query.lock().unwrap() = true;
        self
    }

    pub fn failing_uploads(self) -> Self {
        *self.fail_upload.lock().unwrap() = true;
        self
    }

    pub fn failing_clears(self) -> Self {
        *self.fail_clear.lock().unwrap() = true;
        self
    }

    pub fn query_calls(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn clear_calls(&self) -> usize {
        self.clear_calls.load(Ordering::SeqCst)
    }
}

async fn pass(gate: &Option<Arc<Gate>>) {
    if let Some(gate) = gate {
        gate.entered.notify_one();
        gate.release.notified().await;
    }
}

#[async_trait]
impl RagBackend for MockBackend {
    async fn query(&self, query: &str, k: u32) -> Result<QueryAnswer> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.queries.lock().unwrap().push((query.to_string(), k));
        pass(&self.query_gate).await;

        if *self.fail_query.lock().unwrap() {
            return Err(DocqaError::transport("connection refused"));
        }
        self.answer
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| DocqaError::MalformedResponse("no answer configured".into()))
    }

    async fn upload(&self, file: &UploadFile) -> Result<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        pass(&self.upload_gate).await;

        if *self.fail_upload.lock().unwrap() {
            return Err(DocqaError::backend(500, "indexing failed"));
        }
        self.uploaded.lock().unwrap().push(file.filename.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.clear_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_clear.lock().unwrap() {
            return Err(DocqaError::backend(500, "clear failed"));
        }
        Ok(())
    }
}

pub struct Harness {
    pub backend: Arc<MockBackend>,
    pub store: Arc<MemoryKeyValueStore>,
    pub controller: Arc<SessionController>,
}

pub fn harness(backend: MockBackend) -> Harness {
    harness_with_store(backend, Arc::new(MemoryKeyValueStore::new()))
}

pub fn harness_with_store(backend: MockBackend, store: Arc<MemoryKeyValueStore>) -> Harness {
    let backend = Arc::new(backend);
    let controller = Arc::new(SessionController::new(
        backend.clone(),
        store.clone() as Arc<dyn KeyValueStore>,
        &ClientConfig::default(),
    ));
    Harness {
        backend,
        store,
        controller,
    }
}

pub fn pdf(name: &str) -> UploadFile {
    UploadFile::new(name, "application/pdf", b"%PDF-1.4 test".to_vec())
}

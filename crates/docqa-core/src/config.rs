use crate::citation::DEFAULT_CITATION_BUDGET;
use serde::{Deserialize, Serialize};

/// Address of the question-answering backend when nothing overrides it.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Number of context passages requested per query.
pub const DEFAULT_TOP_K: u32 = 3;

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_citation_budget")]
    pub citation_budget: usize,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: default_backend_url(),
            top_k: default_top_k(),
            citation_budget: default_citation_budget(),
            log_level: default_log_level(),
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_top_k() -> u32 {
    DEFAULT_TOP_K
}

fn default_citation_budget() -> usize {
    DEFAULT_CITATION_BUDGET
}

fn default_log_level() -> String {
    "info".to_string()
}

//! HttpRagBackend - reqwest implementation of the backend HTTP contract.
//!
//! - `POST /query`   `{ query, k }` -> `{ answer, context }`
//! - `POST /upload`  multipart form with a single `file` field
//! - `DELETE /clear` no body

use crate::backend::{QueryAnswer, RagBackend};
use async_trait::async_trait;
use docqa_core::config::DEFAULT_BACKEND_URL;
use docqa_core::error::{DocqaError, Result};
use docqa_core::upload::UploadFile;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use serde::{Deserialize, Serialize};

/// Backend reached over HTTP at a fixed base address.
#[derive(Clone)]
pub struct HttpRagBackend {
    client: Client,
    base_url: String,
}

impl HttpRagBackend {
    /// Creates a backend client rooted at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Turns a non-success response into [`DocqaError::Backend`].
    async fn check_status(response: Response) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body_text = response
            .text()
            .await
            .unwrap_or_else(|_| "Failed to read error body".to_string());
        Err(map_http_error(status, body_text))
    }
}

impl Default for HttpRagBackend {
    fn default() -> Self {
        Self::new(DEFAULT_BACKEND_URL)
    }
}

#[async_trait]
impl RagBackend for HttpRagBackend {
    async fn query(&self, query: &str, k: u32) -> Result<QueryAnswer> {
        tracing::debug!("[HttpRagBackend] POST /query (k={})", k);

        let response = self
            .client
            .post(self.endpoint("query"))
            .json(&QueryRequest { query, k })
            .send()
            .await
            .map_err(transport_error)?;

        let response = Self::check_status(response).await?;

        let parsed: QueryResponse = response.json().await.map_err(|err| {
            DocqaError::MalformedResponse(format!("Failed to parse query response: {err}"))
        })?;

        Ok(QueryAnswer {
            answer: parsed.answer,
            context: parsed.context,
        })
    }

    async fn upload(&self, file: &UploadFile) -> Result<()> {
        tracing::debug!(
            "[HttpRagBackend] POST /upload ({}, {} bytes)",
            file.filename,
            file.contents.len()
        );

        let part = Part::bytes(file.contents.clone())
            .file_name(file.filename.clone())
            .mime_str(&file.declared_type)
            .map_err(|err| DocqaError::validation(format!("Invalid declared type: {err}")))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(transport_error)?;

        Self::check_status(response).await?;
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        tracing::debug!("[HttpRagBackend] DELETE /clear");

        let response = self
            .client
            .delete(self.endpoint("clear"))
            .send()
            .await
            .map_err(transport_error)?;

        Self::check_status(response).await?;
        Ok(())
    }
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a str,
    k: u32,
}

#[derive(Deserialize)]
struct QueryResponse {
    answer: String,
    context: Vec<String>,
}

/// Error bodies the backend produces: `{"message": ...}` from handlers,
/// `{"detail": ...}` from request validation.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    detail: Option<serde_json::Value>,
}

fn transport_error(err: reqwest::Error) -> DocqaError {
    DocqaError::transport(format!("Backend request failed: {err}"))
}

fn map_http_error(status: StatusCode, body: String) -> DocqaError {
    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|parsed| {
            parsed.message.or_else(|| {
                parsed.detail.map(|detail| match detail {
                    serde_json::Value::String(text) => text,
                    other => other.to_string(),
                })
            })
        })
        .unwrap_or(body);

    DocqaError::backend(status.as_u16(), message)
}

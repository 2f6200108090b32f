//! Adapter for a self-hosted model server exposing `POST /api/chat`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{endpoint, log_failure, send_json, Backend, DEFAULT_TIMEOUT};
use crate::error::EvalError;
use crate::evaluator::QueryResult;

/// Overrides the server address.
pub const BASE_URL_VAR: &str = "LOCAL_AI_URL";
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
const NAME: &str = "Local Instance";
const MODEL_LABEL: &str = "local-mistral";

/// Client for the local instance. Needs no credential, so it is always queried.
#[derive(Debug, Clone)]
pub struct LocalInstance {
    base_url: String,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct LocalChatRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize, Debug)]
struct LocalChatResponse {
    #[serde(default)]
    response: Option<String>,
}

impl LocalInstance {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
        }
    }

    /// Uses `LOCAL_AI_URL`, falling back to `http://localhost:8000`.
    pub fn from_env() -> Self {
        let base_url = std::env::var(BASE_URL_VAR)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Self::new(base_url)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, prompt: &str) -> Result<String, EvalError> {
        let request = self
            .client
            .post(endpoint(&self.base_url, "/api/chat"))
            .timeout(self.timeout)
            .json(&LocalChatRequest { message: prompt });

        let resp: LocalChatResponse = send_json(NAME, request).await?;
        Ok(resp.response.unwrap_or_default())
    }
}

#[async_trait]
impl Backend for LocalInstance {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn query(&self, prompt: &str) -> QueryResult {
        let start = Instant::now();
        match self.send(prompt).await {
            // the local API does not report usage
            Ok(text) => QueryResult::success(text, 0, start.elapsed().as_secs_f64(), MODEL_LABEL),
            Err(err) => log_failure(NAME, &err),
        }
    }
}

//! Anthropic Messages API adapter.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use super::{
    api_key_from_env, endpoint, log_failure, send_json, Backend, DEFAULT_TIMEOUT, NO_API_KEY,
};
use crate::error::EvalError;
use crate::evaluator::QueryResult;

pub const API_KEY_VAR: &str = "ANTHROPIC_API_KEY";
const NAME: &str = "Claude Code";
const BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";
const MODEL: &str = "claude-sonnet-4-20250514";
const MODEL_LABEL: &str = "claude-sonnet-4";
const MAX_TOKENS: u32 = 4000;

/// Client for Anthropic's Messages endpoint.
#[derive(Debug, Clone)]
pub struct Anthropic {
    api_key: Option<SecretString>,
    base_url: String,
    timeout: Duration,
    client: Client,
}

#[derive(Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    content: Vec<AnthropicContent>,
    usage: AnthropicUsage,
}

#[derive(Deserialize, Debug)]
struct AnthropicContent {
    text: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

impl Anthropic {
    /// Creates a client; `None` leaves it permanently skipped.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(SecretString::new),
            base_url: BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
        }
    }

    /// Reads `ANTHROPIC_API_KEY`.
    pub fn from_env() -> Self {
        let mut backend = Self::new(None);
        backend.api_key = api_key_from_env(API_KEY_VAR, NAME);
        backend
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn send(&self, api_key: &SecretString, prompt: &str) -> Result<(String, u64), EvalError> {
        let body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let request = self
            .client
            .post(endpoint(&self.base_url, "/v1/messages"))
            .header("x-api-key", api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .timeout(self.timeout)
            .json(&body);

        let resp: AnthropicResponse = send_json(NAME, request).await?;
        let text = resp
            .content
            .into_iter()
            .find_map(|block| block.text)
            .ok_or_else(|| EvalError::ResponseFormat {
                message: "no text content in response".to_string(),
                raw_response: String::new(),
            })?;
        Ok((text, resp.usage.input_tokens + resp.usage.output_tokens))
    }
}

#[async_trait]
impl Backend for Anthropic {
    fn name(&self) -> &str {
        NAME
    }

    fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    async fn query(&self, prompt: &str) -> QueryResult {
        let Some(api_key) = &self.api_key else {
            return QueryResult::skipped(NO_API_KEY);
        };

        let start = Instant::now();
        match self.send(api_key, prompt).await {
            Ok((text, tokens)) => {
                QueryResult::success(text, tokens, start.elapsed().as_secs_f64(), MODEL_LABEL)
            }
            Err(err) => log_failure(NAME, &err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_skips_without_network() {
        let backend = Anthropic::new(None).with_base_url("http://127.0.0.1:1");
        let result = backend.query("hello").await;

        assert!(!backend.is_available());
        assert_eq!(result.response, "SKIPPED - No API key");
        assert_eq!(result.tokens, 0);
        assert_eq!(result.time, 0.0);
    }

    #[tokio::test]
    async fn sums_input_and_output_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", API_VERSION)
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"claude-sonnet-4-20250514","max_tokens":4000,"messages":[{"role":"user","content":"hello"}]}"#
                    .to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"content":[{"type":"text","text":"def is_prime(n): ..."}],"usage":{"input_tokens":12,"output_tokens":30}}"#,
            )
            .create_async()
            .await;

        let backend = Anthropic::new(Some("test-key".to_string())).with_base_url(server.url());
        let result = backend.query("hello").await;

        mock.assert_async().await;
        assert_eq!(result.response, "def is_prime(n): ...");
        assert_eq!(result.tokens, 42);
        assert_eq!(result.model.as_deref(), Some("claude-sonnet-4"));
        assert!(result.time >= 0.0);
    }

    #[tokio::test]
    async fn non_success_status_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .create_async()
            .await;

        let backend = Anthropic::new(Some("bad".to_string())).with_base_url(server.url());
        let result = backend.query("hello").await;

        assert_eq!(result.response, "ERROR: HTTP 401");
        assert_eq!(result.tokens, 0);
        assert_eq!(result.time, 0.0);
    }

    #[tokio::test]
    async fn empty_content_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content":[],"usage":{"input_tokens":1,"output_tokens":0}}"#)
            .create_async()
            .await;

        let backend = Anthropic::new(Some("k".to_string())).with_base_url(server.url());
        assert!(backend.query("hello").await.is_error());
    }
}

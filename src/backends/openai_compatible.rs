//! Shared adapter for services speaking the OpenAI chat-completions format.
//!
//! Each service supplies an [`ChatCompletionsConfig`] with its wiring; the
//! request, auth and extraction logic lives here once.

use std::marker::PhantomData;
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

/// Per-service constants for a chat-completions backend.
pub trait ChatCompletionsConfig: Send + Sync + 'static {
    /// Display name used in results.
    const NAME: &'static str;
    /// Environment variable holding the bearer token.
    const API_KEY_VAR: &'static str;
    const DEFAULT_BASE_URL: &'static str;
    /// Path appended to the base URL.
    const CHAT_PATH: &'static str;
    /// Model id sent in the request.
    const MODEL: &'static str;
    /// Short model name recorded in results.
    const MODEL_LABEL: &'static str;
    const MAX_TOKENS: Option<u32>;
}

/// Generic bearer-authenticated chat-completions client.
pub struct ChatCompletionsBackend<C: ChatCompletionsConfig> {
    api_key: Option<SecretString>,
    base_url: String,
    timeout: Duration,
    client: Client,
    _config: PhantomData<C>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMsg,
}

#[derive(Deserialize, Debug)]
struct ChatMsg {
    content: Option<String>,
}

#[derive(Deserialize, Debug)]
struct ChatUsage {
    #[serde(default)]
    total_tokens: u64,
}

impl<C: ChatCompletionsConfig> ChatCompletionsBackend<C> {
    /// Creates a client; `None` leaves it permanently skipped.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key: api_key.map(SecretString::new),
            base_url: C::DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            client: Client::new(),
            _config: PhantomData,
        }
    }

    /// Reads the key from `C::API_KEY_VAR`.
    pub fn from_env() -> Self {
        let mut backend = Self::new(None);
        backend.api_key = api_key_from_env(C::API_KEY_VAR, C::NAME);
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
        let body = ChatRequest {
            model: C::MODEL,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: C::MAX_TOKENS,
        };

        let request = self
            .client
            .post(endpoint(&self.base_url, C::CHAT_PATH))
            .bearer_auth(api_key.expose_secret())
            .timeout(self.timeout)
            .json(&body);

        let resp: ChatResponse = send_json(C::NAME, request).await?;
        let tokens = resp.usage.map(|u| u.total_tokens).unwrap_or(0);
        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| EvalError::ResponseFormat {
                message: "no choices in response".to_string(),
                raw_response: String::new(),
            })?;
        Ok((choice.message.content.unwrap_or_default(), tokens))
    }
}

#[async_trait]
impl<C: ChatCompletionsConfig> Backend for ChatCompletionsBackend<C> {
    fn name(&self) -> &str {
        C::NAME
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
                QueryResult::success(text, tokens, start.elapsed().as_secs_f64(), C::MODEL_LABEL)
            }
            Err(err) => log_failure(C::NAME, &err),
        }
    }
}

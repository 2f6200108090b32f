//! Backend adapters: one per text-generation service, all behind [`Backend`].
//!
//! Adapters read their credential once at construction. Every failure mode
//! (no credential, transport error, non-2xx, undecodable body) comes back as a
//! sentinel [`QueryResult`] instead of an error.

pub mod anthropic;
pub mod grok;
pub mod local;
pub mod openai;
pub mod openai_compatible;
pub mod perplexity;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::RequestBuilder;
use secrecy::SecretString;
use serde::de::DeserializeOwned;

use crate::error::EvalError;
use crate::evaluator::QueryResult;

pub use anthropic::Anthropic;
pub use grok::Grok;
pub use local::LocalInstance;
pub use openai::OpenAI;
pub use perplexity::Perplexity;

/// Read timeout applied to every outbound call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Skip reason recorded when a credential is missing.
pub const NO_API_KEY: &str = "No API key";

/// Uniform query interface over a text-generation service.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Display name, also the key of this backend's entry in results.
    fn name(&self) -> &str;

    /// Whether `query` would reach the network.
    fn is_available(&self) -> bool;

    /// Sends `prompt` and reports the answer. Never fails; see [`QueryResult`].
    async fn query(&self, prompt: &str) -> QueryResult;
}

/// The stock backend line-up, in invocation order.
pub fn default_backends() -> Vec<Box<dyn Backend>> {
    default_backends_with_timeout(DEFAULT_TIMEOUT)
}

pub fn default_backends_with_timeout(timeout: Duration) -> Vec<Box<dyn Backend>> {
    vec![
        Box::new(Anthropic::from_env().with_timeout(timeout)),
        Box::new(OpenAI::from_env().with_timeout(timeout)),
        Box::new(Grok::new()),
        Box::new(Perplexity::from_env().with_timeout(timeout)),
        Box::new(LocalInstance::from_env().with_timeout(timeout)),
    ]
}

/// Reads an API key, treating unset and blank the same.
pub(crate) fn api_key_from_env(var: &str, backend: &str) -> Option<SecretString> {
    match std::env::var(var) {
        Ok(key) if !key.trim().is_empty() => Some(SecretString::new(key)),
        _ => {
            log::warn!("{var} not set. Skipping {backend}.");
            None
        }
    }
}

pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), path.trim_start_matches('/'))
}

/// Sends a prepared request and decodes a JSON body from a 2xx reply.
pub(crate) async fn send_json<T: DeserializeOwned>(
    backend: &str,
    request: RequestBuilder,
) -> Result<T, EvalError> {
    let resp = request.send().await?;
    let status = resp.status();
    log::debug!("{backend} HTTP status: {status}");

    if !status.is_success() {
        return Err(EvalError::Status(status.as_u16()));
    }

    let raw = resp.text().await?;
    if log::log_enabled!(log::Level::Trace) {
        log::trace!("{backend} response body: {raw}");
    }
    serde_json::from_str(&raw).map_err(|e| EvalError::ResponseFormat {
        message: e.to_string(),
        raw_response: raw,
    })
}

pub(crate) fn log_failure(backend: &str, err: &EvalError) -> QueryResult {
    log::warn!("{backend} query failed: {err}");
    QueryResult::error(err)
}

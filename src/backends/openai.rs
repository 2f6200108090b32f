//! OpenAI chat-completions adapter.

use super::openai_compatible::{ChatCompletionsBackend, ChatCompletionsConfig};

pub struct OpenAIConfig;

impl ChatCompletionsConfig for OpenAIConfig {
    const NAME: &'static str = "ChatGPT";
    const API_KEY_VAR: &'static str = "OPENAI_API_KEY";
    const DEFAULT_BASE_URL: &'static str = "https://api.openai.com";
    const CHAT_PATH: &'static str = "/v1/chat/completions";
    const MODEL: &'static str = "gpt-4-turbo-preview";
    const MODEL_LABEL: &'static str = "gpt-4-turbo";
    const MAX_TOKENS: Option<u32> = Some(4000);
}

/// Client for OpenAI's chat API.
pub type OpenAI = ChatCompletionsBackend<OpenAIConfig>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::Backend;

    #[tokio::test]
    async fn reads_first_choice_and_total_tokens() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"model":"gpt-4-turbo-preview","max_tokens":4000}"#.to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"choices":[{"message":{"role":"assistant","content":"first"}},{"message":{"role":"assistant","content":"second"}}],"usage":{"prompt_tokens":5,"completion_tokens":7,"total_tokens":12}}"#,
            )
            .create_async()
            .await;

        let backend = OpenAI::new(Some("sk-test".to_string())).with_base_url(server.url());
        let result = backend.query("reverse a string").await;

        mock.assert_async().await;
        assert_eq!(backend.name(), "ChatGPT");
        assert_eq!(result.response, "first");
        assert_eq!(result.tokens, 12);
        assert_eq!(result.model.as_deref(), Some("gpt-4-turbo"));
    }

    #[tokio::test]
    async fn transport_failure_becomes_error() {
        // nothing listens on port 1
        let backend = OpenAI::new(Some("sk-test".to_string())).with_base_url("http://127.0.0.1:1");
        let result = backend.query("hello").await;

        assert!(result.response.starts_with("ERROR:"));
        assert_eq!(result.tokens, 0);
        assert_eq!(result.time, 0.0);
    }

    #[tokio::test]
    async fn missing_choices_becomes_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/v1/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let backend = OpenAI::new(Some("sk-test".to_string())).with_base_url(server.url());
        assert!(backend.query("hello").await.is_error());
    }
}

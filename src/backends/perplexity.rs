//! Perplexity adapter (OpenAI-style chat completions, online Sonar model).

use super::openai_compatible::{ChatCompletionsBackend, ChatCompletionsConfig};

pub struct PerplexityConfig;

impl ChatCompletionsConfig for PerplexityConfig {
    const NAME: &'static str = "Perplexity";
    const API_KEY_VAR: &'static str = "PERPLEXITY_API_KEY";
    const DEFAULT_BASE_URL: &'static str = "https://api.perplexity.ai";
    const CHAT_PATH: &'static str = "/chat/completions";
    const MODEL: &'static str = "llama-3.1-sonar-large-128k-online";
    const MODEL_LABEL: &'static str = "sonar-large";
    const MAX_TOKENS: Option<u32> = None;
}

pub type Perplexity = ChatCompletionsBackend<PerplexityConfig>;

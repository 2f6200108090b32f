use async_trait::async_trait;

use super::Backend;
use crate::evaluator::QueryResult;

/// Placeholder for the xAI Grok API; always skipped.
#[derive(Debug, Clone, Default)]
pub struct Grok;

impl Grok {
    pub fn new() -> Self {
        log::warn!("Grok API interface not implemented yet");
        Self
    }
}

#[async_trait]
impl Backend for Grok {
    fn name(&self) -> &str {
        "Grok"
    }

    fn is_available(&self) -> bool {
        false
    }

    async fn query(&self, _prompt: &str) -> QueryResult {
        QueryResult::skipped("API not available")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn always_skipped() {
        let result = Grok::new().query("anything").await;
        assert_eq!(result.response, "SKIPPED - API not available");
        assert_eq!(result.tokens, 0);
        assert!(result.model.is_none());
    }
}

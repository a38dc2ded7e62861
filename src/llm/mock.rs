use async_trait::async_trait;

use crate::error::Result;
use crate::llm::provider::LLMProvider;

/// Offline provider for local frontend work. Needs no credential.
#[derive(Debug, Default, Clone)]
pub struct MockProvider;

impl MockProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl LLMProvider for MockProvider {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String> {
        let lead = prompt.lines().next().unwrap_or_default();
        Ok(format!(
            "[mock response from {}]\n\nReceived a {}-line prompt.\n\n> {}",
            model,
            prompt.lines().count(),
            lead
        ))
    }

    fn name(&self) -> &str {
        "Mock"
    }
}

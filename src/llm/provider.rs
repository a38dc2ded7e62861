use async_trait::async_trait;
use crate::error::Result;

/// A backend that turns a prompt into a text completion for a given model.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    async fn complete(&self, model: &str, prompt: &str) -> Result<String>;
    fn name(&self) -> &str;
}

use serde::Serialize;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;

use crate::error::{Error, Result};
use crate::llm::provider::LLMProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionMode {
    SingleShot,
    Fallback,
}

impl FromStr for CompletionMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "single_shot" => Ok(CompletionMode::SingleShot),
            "fallback" => Ok(CompletionMode::Fallback),
            other => Err(Error::Config(format!(
                "Unknown completion mode '{}' (expected single or fallback)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelStrategy {
    /// One fixed model; its failure is final.
    SingleShot(String),
    /// Candidates tried in order until one answers.
    Fallback(Vec<String>),
}

impl ModelStrategy {
    pub fn mode(&self) -> CompletionMode {
        match self {
            ModelStrategy::SingleShot(_) => CompletionMode::SingleShot,
            ModelStrategy::Fallback(_) => CompletionMode::Fallback,
        }
    }

    pub fn models(&self) -> &[String] {
        match self {
            ModelStrategy::SingleShot(model) => std::slice::from_ref(model),
            ModelStrategy::Fallback(models) => models,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub model: String,
}

pub struct CompletionClient {
    provider: Arc<dyn LLMProvider>,
    strategy: ModelStrategy,
    call_timeout: Duration,
}

impl CompletionClient {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        strategy: ModelStrategy,
        call_timeout: Duration,
    ) -> Result<Self> {
        if strategy.models().is_empty() {
            return Err(Error::Config(
                "Fallback mode needs at least one candidate model".to_string(),
            ));
        }

        Ok(Self {
            provider,
            strategy,
            call_timeout,
        })
    }

    pub fn single_shot(
        provider: Arc<dyn LLMProvider>,
        model: impl Into<String>,
        call_timeout: Duration,
    ) -> Result<Self> {
        Self::new(provider, ModelStrategy::SingleShot(model.into()), call_timeout)
    }

    pub fn fallback(
        provider: Arc<dyn LLMProvider>,
        models: Vec<String>,
        call_timeout: Duration,
    ) -> Result<Self> {
        Self::new(provider, ModelStrategy::Fallback(models), call_timeout)
    }

    pub fn strategy(&self) -> &ModelStrategy {
        &self.strategy
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub async fn complete(&self, prompt: &str) -> Result<Completion> {
        match &self.strategy {
            ModelStrategy::SingleShot(model) => self.attempt(model, prompt).await,
            ModelStrategy::Fallback(models) => self.complete_with_fallback(models, prompt).await,
        }
    }

    async fn complete_with_fallback(&self, models: &[String], prompt: &str) -> Result<Completion> {
        let mut last_error = None;

        for (i, model) in models.iter().enumerate() {
            tracing::debug!("Trying model {} ({}/{})", model, i + 1, models.len());

            match self.attempt(model, prompt).await {
                Ok(completion) => {
                    if i > 0 {
                        tracing::info!("Model {} answered after {} failed attempt(s)", model, i);
                    }
                    return Ok(completion);
                }
                Err(e) => {
                    tracing::warn!("Model {} failed: {}", model, e);
                    last_error = Some(e);
                }
            }
        }

        Err(Error::ModelsExhausted {
            attempts: models.len(),
            last_error: last_error
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no candidate models configured".to_string()),
        })
    }

    async fn attempt(&self, model: &str, prompt: &str) -> Result<Completion> {
        let text = match timeout(self.call_timeout, self.provider.complete(model, prompt)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(Error::Timeout {
                    model: model.to_string(),
                    elapsed: self.call_timeout,
                })
            }
        };

        if text.trim().is_empty() {
            return Err(Error::EmptyCompletion {
                model: model.to_string(),
            });
        }

        Ok(Completion {
            text,
            model: model.to_string(),
        })
    }
}

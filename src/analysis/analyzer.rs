use std::sync::Arc;

use crate::config::{Config, ProviderKind};
use crate::error::{Error, Result};
use crate::llm::{
    build_prompt, ClaudeProvider, CompletionClient, CompletionMode, GeminiProvider, LLMProvider,
    MockProvider, ModelStrategy,
};
use crate::models::{AnalysisRequest, AnalysisResponse, ServiceStatus};

/// Handles analysis requests for one configured provider.
///
/// When the provider credential is missing the analyzer still answers status
/// queries, but every analysis fails with a configuration error.
pub struct CodeAnalyzer {
    provider: ProviderKind,
    backend: Backend,
}

enum Backend {
    Ready(CompletionClient),
    Unconfigured {
        reason: String,
        strategy: ModelStrategy,
    },
}

impl CodeAnalyzer {
    pub fn new(provider: ProviderKind, completion: CompletionClient) -> Self {
        Self {
            provider,
            backend: Backend::Ready(completion),
        }
    }

    pub fn unconfigured(
        provider: ProviderKind,
        strategy: ModelStrategy,
        reason: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            backend: Backend::Unconfigured {
                reason: reason.into(),
                strategy,
            },
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let strategy = match config.mode {
            CompletionMode::SingleShot => ModelStrategy::SingleShot(config.model.clone()),
            CompletionMode::Fallback => ModelStrategy::Fallback(config.fallback_models.clone()),
        };

        let llm: Arc<dyn LLMProvider> = match (config.provider, config.api_key.as_ref()) {
            (ProviderKind::Mock, _) => Arc::new(MockProvider::new()),
            (ProviderKind::Claude, Some(key)) => Arc::new(ClaudeProvider::new(
                key.clone(),
                config.max_tokens,
                config.request_timeout,
            )?),
            (ProviderKind::Gemini, Some(key)) => Arc::new(GeminiProvider::new(
                key.clone(),
                config.max_tokens,
                config.request_timeout,
            )?),
            (provider, None) => {
                let var = provider.api_key_var().unwrap_or("the provider API key");
                return Ok(Self::unconfigured(
                    provider,
                    strategy,
                    format!("API key not configured. Please add {} to .env file", var),
                ));
            }
        };

        let completion = CompletionClient::new(llm, strategy, config.request_timeout)?;
        Ok(Self::new(config.provider, completion))
    }

    pub fn is_configured(&self) -> bool {
        matches!(self.backend, Backend::Ready(_))
    }

    fn strategy(&self) -> &ModelStrategy {
        match &self.backend {
            Backend::Ready(client) => client.strategy(),
            Backend::Unconfigured { strategy, .. } => strategy,
        }
    }

    pub async fn analyze(&self, request: AnalysisRequest) -> Result<AnalysisResponse> {
        request.validate()?;

        let client = match &self.backend {
            Backend::Ready(client) => client,
            Backend::Unconfigured { reason, .. } => return Err(Error::Config(reason.clone())),
        };

        tracing::info!(
            "Analyzing {} snippet ({} chars) with action {}",
            request.language,
            request.code.len(),
            request.action
        );

        let prompt = build_prompt(&request.code, &request.language, request.action);
        let completion = client.complete(&prompt).await?;

        tracing::info!(
            "{} model {} answered with {} chars",
            client.provider_name(),
            completion.model,
            completion.text.len()
        );

        Ok(AnalysisResponse {
            success: true,
            response: completion.text,
            action: request.action,
            language: request.language,
            model_used: Some(completion.model),
        })
    }

    pub fn status(&self) -> ServiceStatus {
        let strategy = self.strategy();
        ServiceStatus {
            message: "AI Code Assistant API".to_string(),
            status: "running".to_string(),
            provider: self.provider,
            api_key_configured: self.is_configured(),
            mode: strategy.mode(),
            models: strategy.models().to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Action;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    struct Recording {
        reply: &'static str,
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LLMProvider for Recording {
        async fn complete(&self, _model: &str, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.to_string())
        }

        fn name(&self) -> &str {
            "Recording"
        }
    }

    fn recording_analyzer(reply: &'static str) -> (CodeAnalyzer, Arc<Recording>) {
        let provider = Arc::new(Recording {
            reply,
            prompts: Mutex::new(Vec::new()),
        });
        let client =
            CompletionClient::single_shot(provider.clone(), "test-model", Duration::from_secs(5))
                .unwrap();
        (CodeAnalyzer::new(ProviderKind::Claude, client), provider)
    }

    #[tokio::test]
    async fn test_analyze_echoes_request_fields() {
        let (analyzer, provider) = recording_analyzer("It prints 1.");
        let response = analyzer
            .analyze(AnalysisRequest::new("print(1)", "python", Action::Explain))
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.response, "It prints 1.");
        assert_eq!(response.action, Action::Explain);
        assert_eq!(response.language, "python");
        assert_eq!(response.model_used.as_deref(), Some("test-model"));

        let prompts = provider.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert_eq!(prompts[0], build_prompt("print(1)", "python", Action::Explain));
    }

    #[tokio::test]
    async fn test_blank_code_never_reaches_provider() {
        let (analyzer, provider) = recording_analyzer("unused");
        let err = analyzer
            .analyze(AnalysisRequest::new("  \n ", "rust", Action::FindBugs))
            .await
            .unwrap_err();

        assert!(err.is_client_error());
        assert!(provider.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unconfigured_analyzer_reports_missing_key() {
        let config = Config::from_vars(|_| None).unwrap();
        let analyzer = CodeAnalyzer::from_config(&config).unwrap();
        assert!(!analyzer.is_configured());

        let err = analyzer
            .analyze(AnalysisRequest::new("x = 1", "python", Action::Improve))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("ANTHROPIC_API_KEY"));

        let status = analyzer.status();
        assert!(!status.api_key_configured);
        assert_eq!(status.models, vec!["claude-sonnet-4-20250514"]);
    }

    #[tokio::test]
    async fn test_validation_precedes_configuration_check() {
        let config = Config::from_vars(|_| None).unwrap();
        let analyzer = CodeAnalyzer::from_config(&config).unwrap();

        let err = analyzer
            .analyze(AnalysisRequest::new("", "python", Action::Explain))
            .await
            .unwrap_err();
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_mock_provider_from_config() {
        let config = Config::from_vars(|key| match key {
            "LLM_PROVIDER" => Some("mock".to_string()),
            _ => None,
        })
        .unwrap();
        let analyzer = CodeAnalyzer::from_config(&config).unwrap();

        let status = analyzer.status();
        assert!(status.api_key_configured);
        assert_eq!(status.mode, CompletionMode::Fallback);

        let response = analyzer
            .analyze(AnalysisRequest::new("let x = 1;", "rust", Action::Improve))
            .await
            .unwrap();
        assert_eq!(response.model_used.as_deref(), Some("mock-1"));
        assert!(response.response.contains("senior software engineer"));
    }
}

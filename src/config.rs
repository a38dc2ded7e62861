use serde::Serialize;
use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::llm::CompletionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Claude,
    Gemini,
    Mock,
}

impl FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "claude" | "anthropic" => Ok(ProviderKind::Claude),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(Error::Config(format!(
                "Unknown LLM provider '{}' (expected claude, gemini or mock)",
                other
            ))),
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Claude => write!(f, "claude"),
            ProviderKind::Gemini => write!(f, "gemini"),
            ProviderKind::Mock => write!(f, "mock"),
        }
    }
}

impl ProviderKind {
    /// Environment variable holding the credential, if the provider needs one.
    pub fn api_key_var(&self) -> Option<&'static str> {
        match self {
            ProviderKind::Claude => Some("ANTHROPIC_API_KEY"),
            ProviderKind::Gemini => Some("GEMINI_API_KEY"),
            ProviderKind::Mock => None,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::Claude => "claude-sonnet-4-20250514",
            ProviderKind::Gemini => "gemini-2.0-flash",
            ProviderKind::Mock => "mock-1",
        }
    }

    pub fn default_candidates(&self) -> Vec<String> {
        let models: &[&str] = match self {
            ProviderKind::Claude => &["claude-sonnet-4-20250514", "claude-3-5-haiku-20241022"],
            ProviderKind::Gemini => &["gemini-2.0-flash", "gemini-1.5-flash", "gemini-1.5-pro"],
            ProviderKind::Mock => &["mock-1"],
        };
        models.iter().map(|m| m.to_string()).collect()
    }

    pub fn default_mode(&self) -> CompletionMode {
        match self {
            ProviderKind::Claude => CompletionMode::SingleShot,
            ProviderKind::Gemini | ProviderKind::Mock => CompletionMode::Fallback,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub api_key: Option<String>,
    pub mode: CompletionMode,
    pub model: String,
    pub fallback_models: Vec<String>,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// A missing credential is not an error here: the service still starts and
    /// reports itself as unconfigured.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let provider = match var("LLM_PROVIDER") {
            Some(v) => v.parse()?,
            None => ProviderKind::Claude,
        };

        let api_key = provider
            .api_key_var()
            .and_then(|name| var(name))
            .map(|key| key.trim().to_string());

        let mode = match var("COMPLETION_MODE") {
            Some(v) => v.parse()?,
            None => provider.default_mode(),
        };

        let model = var("LLM_MODEL").unwrap_or_else(|| provider.default_model().to_string());

        let fallback_models = match var("LLM_FALLBACK_MODELS") {
            Some(list) => {
                let models: Vec<String> = list
                    .split(',')
                    .map(|m| m.trim())
                    .filter(|m| !m.is_empty())
                    .map(|m| m.to_string())
                    .collect();
                if models.is_empty() {
                    return Err(Error::Config(
                        "LLM_FALLBACK_MODELS does not name any model".to_string(),
                    ));
                }
                models
            }
            None => provider.default_candidates(),
        };

        let max_tokens = parse_var(&var, "MAX_TOKENS", 1000)?;
        let timeout_secs: u64 = parse_var(&var, "REQUEST_TIMEOUT_SECS", 60)?;
        if timeout_secs == 0 {
            return Err(Error::Config("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }

        let host = var("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var(&var, "PORT", 8000)?;

        Ok(Self {
            provider,
            api_key,
            mode,
            model,
            fallback_models,
            max_tokens,
            request_timeout: Duration::from_secs(timeout_secs),
            host,
            port,
        })
    }

    /// Candidate models in the order they are tried.
    pub fn candidate_models(&self) -> Vec<String> {
        match self.mode {
            CompletionMode::SingleShot => vec![self.model.clone()],
            CompletionMode::Fallback => self.fallback_models.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.provider.api_key_var().is_none() || self.api_key.is_some()
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T, F>(var: &F, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| Error::Config(format!("{} has an invalid value: '{}'", key, raw))),
        None => Ok(default),
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::config::ProviderKind;
use crate::error::{Error, Result};
use crate::llm::CompletionMode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum Action {
    Explain,
    FindBugs,
    Improve,
}

impl Action {
    pub const ALL: [Action; 3] = [Action::Explain, Action::FindBugs, Action::Improve];

    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Explain => "explain",
            Action::FindBugs => "find_bugs",
            Action::Improve => "improve",
        }
    }
}

impl FromStr for Action {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Action::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Invalid action '{}'. Expected one of: explain, find_bugs, improve",
                    s
                ))
            })
    }
}

impl TryFrom<String> for Action {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Body of `POST /analyze`. Unknown fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub code: String,
    pub language: String,
    pub action: Action,
}

impl AnalysisRequest {
    pub fn new(code: impl Into<String>, language: impl Into<String>, action: Action) -> Self {
        Self {
            code: code.into(),
            language: language.into(),
            action,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(Error::Validation("Code cannot be empty".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub response: String,
    pub action: Action,
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_used: Option<String>,
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    pub message: String,
    pub status: String,
    pub provider: ProviderKind,
    pub api_key_configured: bool,
    pub mode: CompletionMode,
    pub models: Vec<String>,
}

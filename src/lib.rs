pub mod config;
pub mod error;
pub mod models;
pub mod llm;
pub mod analysis;
pub mod server;

pub use config::{Config, ProviderKind};
pub use error::{Error, Result};
pub use llm::{ClaudeProvider, CompletionClient, GeminiProvider, LLMProvider, MockProvider};
pub use analysis::CodeAnalyzer;

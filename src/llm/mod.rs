pub mod provider;
pub mod claude;
pub mod gemini;
pub mod mock;
pub mod prompts;
pub mod completion;

pub use provider::LLMProvider;
pub use claude::ClaudeProvider;
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use prompts::build_prompt;
pub use completion::{Completion, CompletionClient, CompletionMode, ModelStrategy};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("LLM API error: {0}")]
    LLMApi(String),

    #[error("Empty response from model {model}")]
    EmptyCompletion { model: String },

    #[error("Model {model} timed out after {elapsed:?}")]
    Timeout { model: String, elapsed: std::time::Duration },

    #[error("All {attempts} candidate models failed. Last error: {last_error}")]
    ModelsExhausted { attempts: usize, last_error: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Errors caused by the caller's request rather than the service or provider.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_validation_is_client_error() {
        assert!(Error::Validation("Code cannot be empty".into()).is_client_error());
        assert!(!Error::Config("missing key".into()).is_client_error());
        assert!(!Error::EmptyCompletion { model: "m".into() }.is_client_error());
    }

    #[test]
    fn test_exhausted_message_carries_last_error() {
        let err = Error::ModelsExhausted {
            attempts: 3,
            last_error: "quota exceeded for gemini-1.5-pro".into(),
        };
        assert!(err.to_string().contains("quota exceeded for gemini-1.5-pro"));
    }
}

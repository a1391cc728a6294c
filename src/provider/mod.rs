//! AI text-completion capability
//!
//! The pipeline treats the AI provider as a pluggable capability: given a
//! system prompt and the message history, it returns free text. Everything
//! that interprets that text (clarification detection, readiness signals)
//! lives in `conversation`, so providers stay dumb and swappable.

pub mod mock;
pub mod openai_compatible;

pub use mock::MockProvider;
pub use openai_compatible::OpenAiCompatibleClient;

use crate::model::Message;
use async_trait::async_trait;
use thiserror::Error;

/// Errors from the completion provider
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API error{}: {message}", status_code.map(|c| format!(" ({})", c)).unwrap_or_default())]
    Api {
        message: String,
        status_code: Option<u16>,
    },

    #[error("Authentication failed: {message}")]
    Authentication { message: String },

    #[error("Request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("Network error: {message}")]
    Network { message: String },

    #[error("Invalid response from provider: {message}")]
    InvalidResponse { message: String },

    #[error("Provider configuration error: {message}")]
    Configuration { message: String },
}

/// A text-completion backend
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete the conversation, returning the assistant's free text
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[Message],
    ) -> Result<String, ProviderError>;

    /// Human-readable provider name
    fn name(&self) -> &str;

    /// Optional model/endpoint detail for logging
    fn model_info(&self) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_with_status() {
        let err = ProviderError::Api {
            message: "overloaded".to_string(),
            status_code: Some(529),
        };
        assert_eq!(err.to_string(), "API error (529): overloaded");
    }

    #[test]
    fn test_api_error_display_without_status() {
        let err = ProviderError::Api {
            message: "unknown".to_string(),
            status_code: None,
        };
        assert_eq!(err.to_string(), "API error: unknown");
    }
}

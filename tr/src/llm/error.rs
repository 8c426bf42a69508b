//! LLM error types

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur while talking to the provider
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Missing API key: set the {0} environment variable")]
    MissingApiKey(String),

    #[error("Unknown LLM provider: '{0}'. Supported: gemini")]
    UnknownProvider(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Check if this is a rate limit error
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, LlmError::RateLimited { .. })
    }

    /// Message suitable for showing to a person, without the variant prefix
    ///
    /// `None` when the error carries nothing more useful than its kind.
    pub fn provider_message(&self) -> Option<String> {
        match self {
            LlmError::ApiError { message, .. } if !message.trim().is_empty() => Some(message.trim().to_string()),
            LlmError::ApiError { .. } => None,
            LlmError::RateLimited { .. } => Some("The AI service is busy right now. Please try again shortly.".to_string()),
            LlmError::Network(e) if e.is_timeout() => Some("The request to the AI service timed out.".to_string()),
            LlmError::Network(e) => Some(e.to_string()),
            LlmError::MissingApiKey(_) | LlmError::UnknownProvider(_) => Some(self.to_string()),
            LlmError::InvalidResponse(_) | LlmError::Json(_) => None,
        }
    }
}

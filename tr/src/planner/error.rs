//! Itinerary request errors

use thiserror::Error;

use crate::domain::FormatError;
use crate::form::REQUEST_FAILED_FALLBACK;
use crate::llm::LlmError;

/// Banner text for any payload that is not a usable itinerary
pub const FORMAT_ERROR_MESSAGE: &str = "The AI provided an invalid itinerary format. Please try again.";

/// Why an itinerary request failed
#[derive(Debug, Error)]
pub enum PlanError {
    /// Transport, auth or quota failure
    #[error("provider error: {0}")]
    Provider(#[from] LlmError),

    /// The provider answered, but not with a valid itinerary
    #[error("invalid itinerary format: {0}")]
    Format(#[from] FormatError),

    /// A prompt template could not be loaded or rendered
    #[error("prompt error: {0}")]
    Prompt(String),
}

impl PlanError {
    /// The single line shown to the traveller
    pub fn user_message(&self) -> String {
        match self {
            PlanError::Provider(e) => e.provider_message().unwrap_or_else(|| REQUEST_FAILED_FALLBACK.to_string()),
            PlanError::Format(_) => FORMAT_ERROR_MESSAGE.to_string(),
            PlanError::Prompt(_) => REQUEST_FAILED_FALLBACK.to_string(),
        }
    }

    pub fn is_format(&self) -> bool {
        matches!(self, PlanError::Format(_))
    }
}

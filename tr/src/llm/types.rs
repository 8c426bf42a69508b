//! Provider-agnostic request/response types

use serde::{Deserialize, Serialize};

/// Everything needed for one structured-output call
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// User prompt
    pub prompt: String,

    /// Role description for the model
    pub system_instruction: String,

    /// Shape the reply must take, in the provider's schema dialect
    pub response_schema: serde_json::Value,

    /// Max tokens for response (capped by config)
    pub max_tokens: u32,
}

/// Response from a completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionResponse {
    /// Raw text payload, expected to be JSON
    pub text: String,

    /// Token usage for logging
    pub usage: TokenUsage,
}

impl CompletionResponse {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            usage: TokenUsage::default(),
        }
    }
}

/// Token counts reported by the provider
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn total(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

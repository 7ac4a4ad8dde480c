//! LLM Provider Port
//!
//! Abstract interface for LLM (Large Language Model) invocations. The
//! pipeline makes exactly two kinds of calls, each with a fixed
//! configuration: conversation replies and context analysis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

/// Options for LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Temperature (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Top-p sampling
    pub top_p: Option<f32>,
    /// Stop sequences
    pub stop_sequences: Option<Vec<String>>,
}

impl CompletionOptions {
    /// Fixed configuration for conversational replies
    pub fn conversation() -> Self {
        Self {
            max_tokens: Some(150),
            temperature: Some(0.9),
            top_p: Some(0.9),
            stop_sequences: None,
        }
    }

    /// Fixed low-temperature configuration for context analysis
    pub fn context_analysis() -> Self {
        Self {
            max_tokens: Some(600),
            temperature: Some(0.2),
            top_p: None,
            stop_sequences: None,
        }
    }
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self::conversation()
    }
}

/// Response from LLM completion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    /// Generated text content
    pub content: String,
    /// Model that generated the response
    pub model: String,
    /// Token usage statistics
    pub usage: TokenUsage,
    /// Finish reason
    pub finish_reason: Option<String>,
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Tokens in the prompt
    pub prompt_tokens: u32,
    /// Tokens in the completion
    pub completion_tokens: u32,
    /// Total tokens used
    pub total_tokens: u32,
}

/// LLM Provider interface
///
/// Abstracts LLM invocations so the chat pipeline can run against any
/// OpenAI-compatible backend (or a mock in tests).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Generate a completion from messages
    async fn complete(
        &self,
        messages: &[ChatMessage],
        options: &CompletionOptions,
    ) -> Result<CompletionResponse, DomainError>;

    /// Get the provider name (e.g., "openai-compat")
    fn provider_name(&self) -> &str;

    /// Get the model ID being used
    fn model_id(&self) -> &str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_presets() {
        let chat = CompletionOptions::conversation();
        assert_eq!(chat.temperature, Some(0.9));
        assert_eq!(chat.max_tokens, Some(150));
        assert_eq!(chat.top_p, Some(0.9));

        let analysis = CompletionOptions::context_analysis();
        assert_eq!(analysis.temperature, Some(0.2));
        assert_eq!(analysis.max_tokens, Some(600));
        assert_eq!(analysis.top_p, None);
    }
}

//! Common types for LLM interactions

use serde::Serialize;

/// LLM request
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// Fixed system instruction, sent ahead of the conversation
    pub system: Option<String>,
    pub messages: Vec<LlmMessage>,
    pub sampling: SamplingParams,
}

/// Message in wire form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmMessage {
    pub role: MessageRole,
    pub content: String,
}

impl LlmMessage {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Roles the completion endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl MessageRole {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// Which request field carries the output token limit.
///
/// Reasoning models on Groq take `max_completion_tokens`; older chat
/// models take `max_tokens`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLimitField {
    MaxTokens,
    MaxCompletionTokens,
}

/// Reasoning effort hint for reasoning-capable models
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasoningEffort {
    Medium,
}

/// Fixed sampling parameters for every request of a session
#[derive(Debug, Clone, PartialEq)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: Option<f32>,
    pub max_tokens: u32,
    pub token_limit_field: TokenLimitField,
    pub reasoning_effort: Option<ReasoningEffort>,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: None,
            max_tokens: 2048,
            token_limit_field: TokenLimitField::MaxCompletionTokens,
            reasoning_effort: None,
        }
    }
}

/// LLM response
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub text: String,
    pub end_turn: bool,
    pub usage: Usage,
}

/// Usage statistics
#[derive(Debug, Clone, Default)]
pub struct Usage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

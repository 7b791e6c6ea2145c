//! LLM provider trait for chat completions

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::types::ChatModel;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// A single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat completion request
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    /// Model to call
    pub model: ChatModel,
    /// Conversation, oldest first
    pub messages: Vec<ChatMessage>,
    /// Sampling temperature; `None` leaves the service default
    pub temperature: Option<f32>,
    /// Sequences at which generation stops
    pub stop: Vec<String>,
}

impl ChatRequest {
    /// Create a request with no stop sequences
    pub fn new(model: ChatModel, messages: Vec<ChatMessage>, temperature: Option<f32>) -> Self {
        Self {
            model,
            messages,
            temperature,
            stop: Vec::new(),
        }
    }

    /// Set stop sequences
    pub fn with_stop<I, S>(mut self, stop: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop = stop.into_iter().map(Into::into).collect();
        self
    }
}

/// Trait for chat-based text generation
///
/// Implementations:
/// - `OpenAiClient`: OpenAI chat completions API
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Run one completion and return the generated text
    async fn chat(&self, request: &ChatRequest) -> Result<String>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}

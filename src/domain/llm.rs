//! Language-model service contract

use std::fmt::Debug;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Role of a message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A message in a conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Parameters for one completion call.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.7,
            max_tokens: 500,
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

/// Token usage statistics
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    pub fn new(prompt_tokens: u32, completion_tokens: u32) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Response from the language-model service.
#[derive(Debug, Clone)]
pub struct ChatCompletion {
    pub content: String,
    pub model: String,
    pub usage: Option<Usage>,
}

impl ChatCompletion {
    pub fn new(content: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            model: model.into(),
            usage: None,
        }
    }

    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }
}

/// Trait for text-completion providers (OpenRouter in production).
///
/// Errors are surfaced, never retried; quota exhaustion arrives as the
/// rate-limited generation variant.
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, PipelineError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}

#[cfg(test)]
pub mod mock {
    use std::sync::Mutex;

    use super::*;

    #[derive(Debug, Default)]
    pub struct MockLlmProvider {
        response: Option<String>,
        error: Option<PipelineError>,
        last_request: Mutex<Option<ChatRequest>>,
    }

    impl MockLlmProvider {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_response(mut self, content: impl Into<String>) -> Self {
            self.response = Some(content.into());
            self
        }

        pub fn with_error(mut self, error: PipelineError) -> Self {
            self.error = Some(error);
            self
        }

        /// The request captured by the most recent `complete` call.
        pub fn last_request(&self) -> Option<ChatRequest> {
            self.last_request.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlmProvider {
        async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, PipelineError> {
            *self.last_request.lock().unwrap() = Some(request.clone());

            if let Some(ref error) = self.error {
                return Err(match error {
                    PipelineError::Generation {
                        message,
                        rate_limited,
                    } => PipelineError::Generation {
                        message: message.clone(),
                        rate_limited: *rate_limited,
                    },
                    other => PipelineError::generation(other.to_string()),
                });
            }

            let content = self
                .response
                .clone()
                .ok_or_else(|| PipelineError::generation("no mock response configured"))?;

            Ok(ChatCompletion::new(content, request.model).with_usage(Usage::new(20, 40)))
        }

        fn provider_name(&self) -> &'static str {
            "mock"
        }
    }
}

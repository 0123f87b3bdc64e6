//! OpenRouter chat completion provider

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{ChatCompletion, ChatRequest, LlmProvider, PipelineError, Usage};
use crate::infrastructure::http_client::HttpClientTrait;

const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api";

/// OpenRouter provider speaking the OpenAI-compatible chat API.
#[derive(Debug)]
pub struct OpenRouterProvider<C: HttpClientTrait> {
    client: C,
    auth_header: String,
    base_url: String,
    /// Attribution headers OpenRouter uses for app ranking.
    site_url: String,
    site_name: String,
}

impl<C: HttpClientTrait> OpenRouterProvider<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENROUTER_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            auth_header: format!("Bearer {}", api_key.into()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            site_url: "http://localhost:3000".to_string(),
            site_name: "Support Widget".to_string(),
        }
    }

    pub fn with_attribution(
        mut self,
        site_url: impl Into<String>,
        site_name: impl Into<String>,
    ) -> Self {
        self.site_url = site_url.into();
        self.site_name = site_name.into();
        self
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
            ("HTTP-Referer", self.site_url.as_str()),
            ("X-Title", self.site_name.as_str()),
        ]
    }

    /// Classify a transport failure. Quota exhaustion is detected from the
    /// error text because OpenRouter surfaces it in more than one shape.
    fn classify_error(error: PipelineError) -> PipelineError {
        let message = error.to_string();
        let lowered = message.to_lowercase();

        if lowered.contains("429") || lowered.contains("rate limit") {
            PipelineError::rate_limited(message)
        } else {
            PipelineError::generation(message)
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait> LlmProvider for OpenRouterProvider<C> {
    async fn complete(&self, request: ChatRequest) -> Result<ChatCompletion, PipelineError> {
        let body = serde_json::json!({
            "model": request.model,
            "messages": request.messages,
            "temperature": request.temperature,
            "max_tokens": request.max_tokens,
        });

        let json = self
            .client
            .post_json(&self.chat_completions_url(), self.headers(), &body)
            .await
            .map_err(Self::classify_error)?;

        let response: OpenRouterResponse = serde_json::from_value(json).map_err(|e| {
            PipelineError::generation(format!("Failed to parse completion response: {}", e))
        })?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::generation("No choices in completion response"))?;

        let mut completion =
            ChatCompletion::new(choice.message.content.unwrap_or_default(), response.model);

        if let Some(usage) = response.usage {
            completion =
                completion.with_usage(Usage::new(usage.prompt_tokens, usage.completion_tokens));
        }

        Ok(completion)
    }

    fn provider_name(&self) -> &'static str {
        "openrouter"
    }
}

// OpenRouter API response types

#[derive(Debug, Deserialize)]
struct OpenRouterResponse {
    model: String,
    choices: Vec<OpenRouterChoice>,
    usage: Option<OpenRouterUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterChoice {
    message: OpenRouterMessage,
}

#[derive(Debug, Deserialize)]
struct OpenRouterMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenRouterUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

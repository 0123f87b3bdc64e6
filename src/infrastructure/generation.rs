//! Prompt assembly and the language-model call

use std::sync::Arc;

use tracing::debug;

use crate::domain::prompt::{knowledge_system_prompt, no_context_system_prompt, ANSWER_CUE};
use crate::domain::{
    AiConfig, ChatCompletion, ChatMessage, ChatRequest, LlmProvider, PipelineError,
};

/// Builds the direct / knowledge-grounded message shapes and calls the
/// language model. No retries here; errors surface to the turn boundary.
#[derive(Debug)]
pub struct GenerationOrchestrator {
    llm: Arc<dyn LlmProvider>,
}

impl GenerationOrchestrator {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Plain completion with just the user message, for widgets running
    /// without retrieval.
    pub async fn generate_direct(
        &self,
        message: &str,
        config: &AiConfig,
    ) -> Result<ChatCompletion, PipelineError> {
        let request = ChatRequest::new(&config.model, vec![ChatMessage::user(message)])
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens);

        self.llm.complete(request).await
    }

    /// Knowledge-grounded completion. The question rides inside the system
    /// instruction next to the knowledge block; the user turn is a fixed
    /// cue. With no context the model is explicitly told to hand off rather
    /// than answer from nothing.
    pub async fn generate_with_context(
        &self,
        message: &str,
        context: &str,
        config: &AiConfig,
    ) -> Result<ChatCompletion, PipelineError> {
        let role_text = config.system_role_text();

        let system_prompt = if context.trim().is_empty() {
            debug!("no knowledge context; instructing model to hand off");
            no_context_system_prompt(role_text)
        } else {
            knowledge_system_prompt(role_text, context, message)
        };

        let request = ChatRequest::new(
            &config.model,
            vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(ANSWER_CUE),
            ],
        )
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

        self.llm.complete(request).await
    }
}

//! The chat-turn service: retrieval, generation and the trust decision
//!
//! This is the single entry point the transport layer calls. Every pipeline
//! error is absorbed here and turned into a well-formed failed response with
//! escalation set; a raw error never crosses this boundary.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::{
    confidence, context, fallback, AiConfig, AiResponse, PipelineError, RetrievalResult,
    ScopeFilter,
};
use crate::infrastructure::generation::GenerationOrchestrator;
use crate::infrastructure::search::VectorSearchEngine;

/// Retrieval quality gate applied to backend similarity scores.
const DEFAULT_SCORE_THRESHOLD: f32 = 0.3;

/// Confidence reported for direct (retrieval-free) answers, which have no
/// sources to score against.
const DIRECT_MODE_CONFIDENCE: f32 = 0.7;

#[derive(Debug)]
pub struct ChatService {
    search: Arc<VectorSearchEngine>,
    generator: Arc<GenerationOrchestrator>,
    score_threshold: f32,
}

impl ChatService {
    pub fn new(search: Arc<VectorSearchEngine>, generator: Arc<GenerationOrchestrator>) -> Self {
        Self {
            search,
            generator,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
        }
    }

    pub fn with_score_threshold(mut self, score_threshold: f32) -> Self {
        self.score_threshold = score_threshold;
        self
    }

    /// Run one chat turn end to end. Always returns a well-formed response.
    pub async fn generate_response(
        &self,
        message: &str,
        widget_id: &str,
        business_id: Option<&str>,
        config: &AiConfig,
    ) -> AiResponse {
        if !config.enabled {
            return AiResponse::failed("AI is disabled for this widget")
                .with_metadata("reason", "AI disabled");
        }

        if !config.rag_enabled {
            return self.direct_turn(message, config).await;
        }

        self.rag_turn(message, widget_id, business_id, config).await
    }

    /// Diagnostic/search-only entry point: retrieval without generation.
    pub async fn retrieve_context(
        &self,
        widget_id: &str,
        business_id: Option<&str>,
        query: &str,
        max_docs: usize,
    ) -> Result<Vec<RetrievalResult>, PipelineError> {
        let scope = scope_for(widget_id, business_id);
        self.search
            .search(query, &scope, max_docs, self.score_threshold)
            .await
    }

    async fn direct_turn(&self, message: &str, config: &AiConfig) -> AiResponse {
        match self.generator.generate_direct(message, config).await {
            Ok(completion) => AiResponse::answered(
                completion.content,
                DIRECT_MODE_CONFIDENCE,
                Vec::new(),
                false,
            )
            .with_metadata("mode", "direct")
            .with_metadata("model", completion.model),
            Err(error) => failed_turn(error),
        }
    }

    async fn rag_turn(
        &self,
        message: &str,
        widget_id: &str,
        business_id: Option<&str>,
        config: &AiConfig,
    ) -> AiResponse {
        let scope = scope_for(widget_id, business_id);

        let results = match self
            .search
            .search(message, &scope, config.max_retrieval_docs, self.score_threshold)
            .await
        {
            Ok(results) => results,
            Err(error) => return failed_turn(error),
        };

        let assembled = context::assemble(&results);

        if assembled.is_empty() {
            warn!(
                widget_id,
                business_id = business_id.unwrap_or_default(),
                "no knowledge context retrieved; answering in handoff mode"
            );
        }

        let completion = match self
            .generator
            .generate_with_context(message, &assembled.context_text, config)
            .await
        {
            Ok(completion) => completion,
            Err(error) => return failed_turn(error),
        };

        let confidence = confidence::score(&completion.content, &assembled.sources);
        let escalate = fallback::should_fallback(confidence, &assembled.sources, config);

        info!(
            widget_id,
            sources = assembled.sources.len(),
            confidence,
            escalate,
            "chat turn completed"
        );

        let sources_count = assembled.sources.len();

        AiResponse::answered(completion.content, confidence, assembled.sources, escalate)
            .with_metadata("mode", "rag")
            .with_metadata("model", completion.model)
            .with_metadata("sources_count", sources_count)
            .with_metadata("widget_id", widget_id)
    }
}

fn scope_for(widget_id: &str, business_id: Option<&str>) -> ScopeFilter {
    let scope = ScopeFilter::for_widget(widget_id);

    match business_id {
        Some(business_id) if !business_id.is_empty() => scope.with_business(business_id),
        _ => scope,
    }
}

fn failed_turn(error: PipelineError) -> AiResponse {
    warn!(error = %error, "chat turn failed");

    let mut response = AiResponse::failed(format!("AI service error: {}", error))
        .with_metadata("error", error.to_string());

    if error.is_rate_limited() {
        response = response.with_metadata("rate_limited", true);
    }

    response
}

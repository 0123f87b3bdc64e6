//! The escalate-to-human decision

use super::ai_config::AiConfig;
use super::fragment::SourceSummary;

/// Decide whether a turn should be routed to a human agent.
///
/// Escalate iff fallback is enabled and either the answer scored below the
/// configured threshold or retrieval produced no sources at all. The
/// AI-disabled and RAG-disabled paths escalate upstream and never reach this
/// predicate.
pub fn should_fallback(confidence: f32, sources: &[SourceSummary], config: &AiConfig) -> bool {
    config.fallback_to_human
        && (confidence < config.confidence_threshold || sources.is_empty())
}

//! The response returned for every chat turn

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::fragment::SourceSummary;

/// Outcome of one chat turn, always well-formed.
///
/// Pipeline failures are folded into this shape with `success = false` and
/// `should_fallback_to_human = true`; the transport layer never has to handle
/// a raw pipeline error.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiResponse {
    pub success: bool,
    pub response: String,
    pub confidence: f32,
    pub sources: Vec<SourceSummary>,
    pub should_fallback_to_human: bool,
    #[serde(default)]
    pub metadata: HashMap<String, serde_json::Value>,
}

impl AiResponse {
    /// A successful answer; fallback and metadata are set by the caller.
    pub fn answered(
        response: impl Into<String>,
        confidence: f32,
        sources: Vec<SourceSummary>,
        should_fallback_to_human: bool,
    ) -> Self {
        Self {
            success: true,
            response: response.into(),
            confidence,
            sources,
            should_fallback_to_human,
            metadata: HashMap::new(),
        }
    }

    /// A failed turn: zero confidence, no sources, always escalated.
    pub fn failed(response: impl Into<String>) -> Self {
        Self {
            success: false,
            response: response.into(),
            confidence: 0.0,
            sources: Vec::new(),
            should_fallback_to_human: true,
            metadata: HashMap::new(),
        }
    }

    pub fn with_metadata(
        mut self,
        key: impl Into<String>,
        value: impl Into<serde_json::Value>,
    ) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

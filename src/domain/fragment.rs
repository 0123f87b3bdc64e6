//! Knowledge fragment payloads and retrieval results

use serde::{Deserialize, Serialize};

/// Payload stored alongside each vector in the knowledge collection.
///
/// A fragment is one chunk of a source document; `chunk_index` is contiguous
/// within `0..total_chunks` for a given `item_id`. Field names are camelCase
/// on the wire because the ingestion side and the dashboard both speak that
/// form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FragmentPayload {
    pub business_id: String,
    pub widget_id: String,
    /// Id of the owning knowledge-base item (one item fans out into chunks).
    pub item_id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub text: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl FragmentPayload {
    pub fn new(
        business_id: impl Into<String>,
        widget_id: impl Into<String>,
        item_id: impl Into<String>,
        title: impl Into<String>,
        doc_type: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            business_id: business_id.into(),
            widget_id: widget_id.into(),
            item_id: item_id.into(),
            title: title.into(),
            doc_type: doc_type.into(),
            text: text.into(),
            chunk_index: 0,
            total_chunks: 1,
            file_name: None,
            file_size: None,
        }
    }

    pub fn with_chunk(mut self, chunk_index: usize, total_chunks: usize) -> Self {
        self.chunk_index = chunk_index;
        self.total_chunks = total_chunks;
        self
    }

    pub fn with_file(mut self, file_name: impl Into<String>, file_size: u64) -> Self {
        self.file_name = Some(file_name.into());
        self.file_size = Some(file_size);
        self
    }
}

/// Scope restriction for a knowledge search.
///
/// The business id takes precedence when both are present; the widget id is
/// the fallback for callers that only know which widget they serve.
#[derive(Debug, Clone)]
pub struct ScopeFilter {
    pub business_id: Option<String>,
    pub widget_id: String,
}

impl ScopeFilter {
    pub fn for_widget(widget_id: impl Into<String>) -> Self {
        Self {
            business_id: None,
            widget_id: widget_id.into(),
        }
    }

    pub fn with_business(mut self, business_id: impl Into<String>) -> Self {
        self.business_id = Some(business_id.into());
        self
    }

    /// The payload field and value this scope filters on.
    pub fn field_match(&self) -> (&'static str, &str) {
        match self.business_id.as_deref() {
            Some(business_id) if !business_id.is_empty() => ("businessId", business_id),
            _ => ("widgetId", &self.widget_id),
        }
    }
}

/// A fragment returned by a similarity search, with its score and the query
/// that produced it. Built per search call, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetrievalResult {
    pub payload: FragmentPayload,
    /// Backend-native similarity score; higher is more relevant.
    pub score: f32,
    /// The normalized query text that was embedded for this search.
    pub query: String,
}

impl RetrievalResult {
    pub fn new(payload: FragmentPayload, score: f32, query: impl Into<String>) -> Self {
        Self {
            payload,
            score,
            query: query.into(),
        }
    }
}

/// Caller-facing summary of a retrieval source, attached to each AI answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceSummary {
    /// Fragment text truncated for display.
    pub content: String,
    pub title: String,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub score: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_camel_case() {
        let payload = FragmentPayload::new("biz-1", "wid-1", "item-1", "Returns", "faq", "30 days")
            .with_chunk(2, 5);
        let json = serde_json::to_value(&payload).unwrap();

        assert_eq!(json["businessId"], "biz-1");
        assert_eq!(json["chunkIndex"], 2);
        assert_eq!(json["totalChunks"], 5);
        assert_eq!(json["type"], "faq");
        assert!(json.get("fileName").is_none());
    }

    #[test]
    fn test_scope_filter_prefers_business_id() {
        let scope = ScopeFilter::for_widget("wid-1").with_business("biz-1");
        assert_eq!(scope.field_match(), ("businessId", "biz-1"));
    }

    #[test]
    fn test_scope_filter_falls_back_to_widget_id() {
        let scope = ScopeFilter::for_widget("wid-1");
        assert_eq!(scope.field_match(), ("widgetId", "wid-1"));

        let scope = ScopeFilter::for_widget("wid-2").with_business("");
        assert_eq!(scope.field_match(), ("widgetId", "wid-2"));
    }
}

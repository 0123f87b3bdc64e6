//! Context assembly from retrieval results

use super::fragment::{RetrievalResult, SourceSummary};

/// Display truncation length for source summaries.
const SOURCE_PREVIEW_CHARS: usize = 200;

/// Fallback title for fragments stored without one.
const UNKNOWN_TITLE: &str = "Unknown";

/// The knowledge block handed to the generation step, plus the parallel
/// source summaries returned to the caller.
#[derive(Debug, Clone, Default)]
pub struct AssembledContext {
    pub context_text: String,
    pub sources: Vec<SourceSummary>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Turn retrieval results into a prompt-ready context block.
///
/// Results arrive already relevance-ordered and are kept that way; fragment
/// texts are joined with blank lines, and each source summary carries a
/// truncated preview with the raw similarity score.
pub fn assemble(results: &[RetrievalResult]) -> AssembledContext {
    let mut context_text = String::new();
    let mut sources = Vec::with_capacity(results.len());

    for result in results {
        context_text.push_str(&result.payload.text);
        context_text.push_str("\n\n");

        let title = if result.payload.title.is_empty() {
            UNKNOWN_TITLE.to_string()
        } else {
            result.payload.title.clone()
        };

        sources.push(SourceSummary {
            content: preview(&result.payload.text),
            title,
            doc_type: result.payload.doc_type.clone(),
            score: result.score,
        });
    }

    AssembledContext {
        context_text,
        sources,
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() <= SOURCE_PREVIEW_CHARS {
        return text.to_string();
    }

    let truncated: String = text.chars().take(SOURCE_PREVIEW_CHARS).collect();
    format!("{}...", truncated)
}

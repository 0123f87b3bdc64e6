//! Embedding provider selection and collection binding

use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Suffix appended to the base collection name for Voyage-embedded vectors.
/// Voyage models produce different dimensions than the OpenAI models the base
/// collection was created with, so they live in a sibling collection.
const VOYAGE_COLLECTION_SUFFIX: &str = "_voyage";

/// Known OpenAI embedding models and their dimensions
const OPENAI_EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-large", 3072),
    ("text-embedding-3-small", 1536),
    ("text-embedding-ada-002", 1536),
];

/// Known Voyage embedding models and their dimensions
const VOYAGE_EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("voyage-3", 1024),
    ("voyage-3-lite", 512),
    ("voyage-2", 1024),
];

/// The supported embedding providers, closed by design: adding a provider
/// means adding a variant and a client implementation, not a string branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingProviderKind {
    OpenAi,
    Voyage,
}

impl EmbeddingProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Voyage => "voyage",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::OpenAi => "text-embedding-3-large",
            Self::Voyage => "voyage-3",
        }
    }

    /// Vector dimension for a model of this provider, if the model is known.
    pub fn dimensions(&self, model: &str) -> Option<usize> {
        let table = match self {
            Self::OpenAi => OPENAI_EMBEDDING_MODELS,
            Self::Voyage => VOYAGE_EMBEDDING_MODELS,
        };

        table
            .iter()
            .find(|(name, _)| *name == model)
            .map(|(_, dims)| *dims)
    }

    /// Collection name for this provider given the configured base name.
    /// OpenAI keeps the base collection; Voyage routes to a suffixed sibling.
    pub fn collection_name(&self, base: &str) -> String {
        match self {
            Self::OpenAi => base.to_string(),
            Self::Voyage => format!("{}{}", base, VOYAGE_COLLECTION_SUFFIX),
        }
    }
}

impl std::fmt::Display for EmbeddingProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for EmbeddingProviderKind {
    type Err = PipelineError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "openai" => Ok(Self::OpenAi),
            "voyage" => Ok(Self::Voyage),
            other => Err(PipelineError::configuration(format!(
                "unknown embedding provider '{}'",
                other
            ))),
        }
    }
}

/// The (provider, model, dimension, collection) tuple in effect for a turn.
///
/// Bindings are immutable snapshots: a turn copies the active binding once at
/// call start and is unaffected by a concurrent provider switch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingBinding {
    pub provider: EmbeddingProviderKind,
    pub model: String,
    pub dimensions: usize,
    pub collection: String,
}

impl EmbeddingBinding {
    /// Resolve a binding for a provider/model pair against a base collection
    /// name. Fails when the model is unknown to the provider's dimension
    /// table; a collection must never be created with a guessed dimension.
    pub fn resolve(
        provider: EmbeddingProviderKind,
        model: &str,
        base_collection: &str,
    ) -> Result<Self, PipelineError> {
        let dimensions = provider.dimensions(model).ok_or_else(|| {
            PipelineError::configuration(format!(
                "unknown embedding model '{}' for provider '{}'",
                model, provider
            ))
        })?;

        Ok(Self {
            provider,
            model: model.to_string(),
            dimensions,
            collection: provider.collection_name(base_collection),
        })
    }

    /// Whether this binding already covers the given provider/model pair.
    pub fn matches(&self, provider: EmbeddingProviderKind, model: &str) -> bool {
        self.provider == provider && self.model == model
    }
}

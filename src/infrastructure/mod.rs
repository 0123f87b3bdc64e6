//! Infrastructure layer - provider clients and pipeline services

pub mod chat;
pub mod embedding;
pub mod generation;
pub mod http_client;
pub mod llm;
pub mod logging;
pub mod router;
pub mod search;
pub mod vector_store;

pub use chat::ChatService;
pub use embedding::{
    EmbeddingCredentials, EmbeddingProviderFactory, HttpEmbeddingProviderFactory,
    OpenAiEmbeddings, VoyageEmbeddings,
};
pub use generation::GenerationOrchestrator;
pub use http_client::{HttpClient, HttpClientTrait};
pub use llm::OpenRouterProvider;
pub use router::EmbeddingRouter;
pub use search::VectorSearchEngine;
pub use vector_store::QdrantVectorStore;

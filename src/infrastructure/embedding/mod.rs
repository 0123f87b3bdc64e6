//! Embedding provider implementations

mod factory;
mod openai;
mod voyage;

pub use factory::{EmbeddingCredentials, EmbeddingProviderFactory, HttpEmbeddingProviderFactory};
pub use openai::OpenAiEmbeddings;
pub use voyage::VoyageEmbeddings;

//! Vector store backend implementations

mod qdrant;

pub use qdrant::QdrantVectorStore;

//! pagelens Vector - external retrieval collaborators
//!
//! Embedding clients (OpenAI, Ollama) and the Qdrant implementation
//! of `PageStore` over a pre-built document collection.

pub mod embedding;
pub mod qdrant_store;

pub use embedding::{create_embedding_client, EmbeddingClient, OllamaEmbedding, OpenAiEmbedding};
pub use qdrant_store::{PayloadLayout, QdrantPageStore};

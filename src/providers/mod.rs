//! Capability abstractions for embeddings and answer generation
//!
//! The pipeline is agnostic to which models implement these traits; the
//! bundled implementation talks to a local Ollama server.

pub mod cache;
pub mod embedding;
pub mod llm;
pub mod ollama;

pub use cache::CachedEmbedder;
pub use embedding::EmbeddingProvider;
pub use llm::LlmProvider;
pub use ollama::OllamaClient;

//! Application state for the Q&A server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::engine::QaEngine;
use crate::error::Result;
use crate::ingestion::HttpDocumentFetcher;
use crate::providers::{EmbeddingProvider, LlmProvider, OllamaClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RagConfig,
    engine: QaEngine,
}

impl AppState {
    /// Create new application state with the Ollama-backed capabilities
    pub fn new(config: RagConfig) -> Result<Self> {
        tracing::info!("Initializing Q&A application state...");

        let ollama = Arc::new(OllamaClient::new(&config.llm));
        let fetcher = Arc::new(HttpDocumentFetcher::new(
            config.processing.fetch_timeout(),
        ));

        let embedding: Arc<dyn EmbeddingProvider> = ollama.clone();
        let llm: Arc<dyn LlmProvider> = ollama;
        let engine = QaEngine::new(config.clone(), fetcher, embedding, llm);
        tracing::info!("Q&A engine initialized");

        Ok(Self {
            inner: Arc::new(AppStateInner { config, engine }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &RagConfig {
        &self.inner.config
    }

    /// Get the question-answering engine
    pub fn engine(&self) -> &QaEngine {
        &self.inner.engine
    }
}

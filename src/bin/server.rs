//! Q&A server binary
//!
//! Run with: cargo run --bin clause-rag-server
//! Optional: CLAUSE_RAG_CONFIG=/path/to/config.toml

use clause_rag::providers::{EmbeddingProvider, OllamaClient};
use clause_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "clause_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = match std::env::var("CLAUSE_RAG_CONFIG") {
        Ok(path) => RagConfig::load(&path)?,
        Err(_) => RagConfig::default(),
    };

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Top-k: {}", config.retrieval.top_k);
    tracing::info!(
        "  - Similarity threshold: {}",
        config.retrieval.similarity_threshold
    );
    tracing::info!("  - Default mode: {}", config.answer.default_mode.as_str());

    if config.server.api_key.is_none() {
        tracing::warn!("No API key configured; the endpoint accepts unauthenticated requests");
    }

    // Check the model server before accepting traffic
    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let ollama = OllamaClient::new(&config.llm);
    match EmbeddingProvider::health_check(&ollama).await {
        Ok(true) => tracing::info!("Ollama is running"),
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Install: brew install ollama");
            tracing::warn!("  2. Start: ollama serve");
            tracing::warn!(
                "  3. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    // Create and start server
    let server = RagServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/v1/run - Answer questions about a document");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}

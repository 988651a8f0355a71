//! Configuration for the Q&A pipeline
//!
//! All tunables live in one explicit structure passed into the pipeline
//! constructor; nothing is read from ambient process state after startup.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::query::AnswerMode;

/// Main pipeline configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Chunking configuration
    pub chunking: ChunkingConfig,
    /// Retrieval configuration
    pub retrieval: RetrievalConfig,
    /// Answer composition configuration
    pub answer: AnswerConfig,
    /// Ollama/LLM configuration
    pub llm: LlmConfig,
    /// Request processing configuration
    pub processing: ProcessingConfig,
}

impl RagConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Invalid config file: {}", e)))
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Shared-secret API key; `None` disables the check
    pub api_key: Option<String>,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_key: None,
            enable_cors: true,
        }
    }
}

/// Text chunking configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Target passage size in characters
    pub chunk_size: usize,
    /// Overlap between consecutive fixed windows in characters
    pub chunk_overlap: usize,
    /// Pack whole sentences instead of sliding fixed windows
    pub sentence_aware: bool,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: 800,
            chunk_overlap: 200,
            sentence_aware: false,
        }
    }
}

/// Retrieval configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    /// Number of passages to retrieve per question
    pub top_k: usize,
    /// Minimum similarity score a passage must reach to qualify (0.0-1.0)
    pub similarity_threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: 1,
            similarity_threshold: 0.25,
        }
    }
}

/// Answer composition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnswerConfig {
    /// Answer mode used when a request does not specify one
    pub default_mode: AnswerMode,
    /// Use the cleanup trimming policy instead of the plain one
    pub snippet_cleanup: bool,
    /// Maximum snippet length in characters before trimming
    pub snippet_max_chars: usize,
}

impl Default for AnswerConfig {
    fn default() -> Self {
        Self {
            default_mode: AnswerMode::Clause,
            snippet_cleanup: false,
            snippet_max_chars: 350,
        }
    }
}

/// LLM (Ollama) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama base URL
    pub base_url: String,
    /// Embedding model name
    pub embed_model: String,
    /// Generation model name
    pub generate_model: String,
    /// Temperature for generation
    pub temperature: f32,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Number of retries for failed requests
    pub max_retries: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            embed_model: "nomic-embed-text".to_string(),
            generate_model: "llama3.2:3b".to_string(),
            temperature: 0.2, // Lower for more factual answers
            timeout_secs: 120,
            max_retries: 2,
        }
    }
}

/// Request processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Wall-clock budget for one request in seconds
    pub request_timeout_secs: u64,
    /// Timeout for fetching a single document in seconds
    pub fetch_timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: 14,
            fetch_timeout_secs: 10,
        }
    }
}

impl ProcessingConfig {
    /// Request budget as a duration
    pub fn request_budget(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Fetch timeout as a duration
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_tuning() {
        let config = RagConfig::default();
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.chunking.chunk_overlap, 200);
        assert_eq!(config.retrieval.top_k, 1);
        assert!((config.retrieval.similarity_threshold - 0.25).abs() < f32::EPSILON);
        assert_eq!(config.answer.default_mode, AnswerMode::Clause);
        assert_eq!(config.answer.snippet_max_chars, 350);
        assert_eq!(config.processing.request_timeout_secs, 14);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: RagConfig = toml::from_str(
            r#"
            [retrieval]
            top_k = 3

            [answer]
            default_mode = "compose"
            "#,
        )
        .unwrap();

        assert_eq!(config.retrieval.top_k, 3);
        assert_eq!(config.answer.default_mode, AnswerMode::Compose);
        // Untouched sections keep their defaults
        assert_eq!(config.chunking.chunk_size, 800);
        assert_eq!(config.server.port, 8000);
    }
}

//! clause-rag: document Q&A with passage retrieval
//!
//! This crate answers natural-language questions about a remotely fetched
//! document by retrieving the most relevant passages from an in-memory vector
//! index and either returning the best-matching clause verbatim (trimmed) or
//! synthesizing a short answer with an LLM constrained to the retrieved
//! content.

pub mod config;
pub mod engine;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod providers;
pub mod retrieval;
pub mod server;
pub mod types;

pub use config::RagConfig;
pub use engine::QaEngine;
pub use error::{Error, Result};
pub use types::{
    query::{AnswerMode, RunRequest},
    response::{QueryOutcome, RunResponse},
};

//! Request types for the answer endpoint

use serde::{Deserialize, Serialize};

/// Answer delivery strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Return the best-matching passage verbatim, trimmed
    Clause,
    /// Synthesize a short answer from the top passages with the LLM
    Compose,
}

impl Default for AnswerMode {
    fn default() -> Self {
        Self::Clause
    }
}

impl AnswerMode {
    /// Parse a mode string; unrecognized values silently fall back to clause
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "compose" => Self::Compose,
            _ => Self::Clause,
        }
    }

    /// Stable name used in cache keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clause => "clause",
            Self::Compose => "compose",
        }
    }
}

/// Request to answer a batch of questions about one document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunRequest {
    /// Document source locator (URL or equivalent opaque identity)
    pub documents: String,
    /// Questions to answer, in order
    pub questions: Vec<String>,
}

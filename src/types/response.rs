//! Response and per-question outcome types

use serde::{Deserialize, Serialize};

/// Answer returned when no passage clears the similarity threshold
pub const NO_RELEVANT_CONTENT: &str = "No relevant content found for this question.";

/// Answer returned when the request deadline elapses mid-pipeline
pub const PROCESSING_TIMEOUT: &str = "Processing timeout. Please try again.";

/// Separator between passages in rationale and prompt context
pub const PASSAGE_SEPARATOR: &str = "\n---\n";

/// Response for a batch answer request, one answer per question in order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResponse {
    pub answers: Vec<String>,
}

/// Terminal outcome of answering one question
///
/// Every path through the pipeline produces a well-formed outcome; timeouts
/// and no-match results are values here, never errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Final answer text
    pub answer: String,
    /// Qualifying passages, nearest first
    pub matched_passages: Vec<String>,
    /// Human-readable account of what matched
    pub rationale: String,
}

impl QueryOutcome {
    /// Outcome for a successfully answered question
    pub fn answered(answer: String, matched_passages: Vec<String>) -> Self {
        let rationale = format!(
            "Matched clauses (top {}):\n{}",
            matched_passages.len(),
            matched_passages.join(PASSAGE_SEPARATOR)
        );
        Self {
            answer,
            matched_passages,
            rationale,
        }
    }

    /// Outcome served from the answer cache; only the answer is retained
    pub fn cached(answer: String) -> Self {
        Self {
            answer,
            matched_passages: Vec::new(),
            rationale: String::new(),
        }
    }

    /// Outcome when no passage qualifies
    pub fn not_found() -> Self {
        Self {
            answer: NO_RELEVANT_CONTENT.to_string(),
            matched_passages: Vec::new(),
            rationale: String::new(),
        }
    }

    /// Outcome when the request deadline elapsed
    pub fn timeout() -> Self {
        Self {
            answer: PROCESSING_TIMEOUT.to_string(),
            matched_passages: Vec::new(),
            rationale: String::new(),
        }
    }

    /// Whether this outcome is the timeout sentinel
    pub fn is_timeout(&self) -> bool {
        self.answer == PROCESSING_TIMEOUT
    }
}

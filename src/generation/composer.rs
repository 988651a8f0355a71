//! Answer composition strategies

use std::sync::Arc;

use crate::config::AnswerConfig;
use crate::providers::LlmProvider;
use crate::retrieval::ScoredPassage;
use crate::types::query::AnswerMode;

use super::concise::concise;
use super::prompt::PromptBuilder;

/// Composes the final answer from qualifying passages
///
/// Callers must pass at least one passage; the "no relevant content" case is
/// decided upstream. Whatever happens downstream (generation error, empty
/// model output), the composer returns a non-empty answer.
pub struct AnswerComposer {
    llm: Arc<dyn LlmProvider>,
    config: AnswerConfig,
}

impl AnswerComposer {
    /// Create a composer
    pub fn new(llm: Arc<dyn LlmProvider>, config: AnswerConfig) -> Self {
        Self { llm, config }
    }

    /// Compose an answer in the requested mode
    pub async fn compose(
        &self,
        question: &str,
        passages: &[ScoredPassage],
        mode: AnswerMode,
    ) -> String {
        debug_assert!(!passages.is_empty(), "composer requires qualifying passages");

        match mode {
            AnswerMode::Clause => self.clause_answer(passages),
            AnswerMode::Compose => self.composed_answer(question, passages).await,
        }
    }

    /// Clause mode: the nearest passage, trimmed
    fn clause_answer(&self, passages: &[ScoredPassage]) -> String {
        concise(
            &passages[0].text,
            self.config.snippet_max_chars,
            self.config.snippet_cleanup,
        )
    }

    /// Compose mode: short LLM synthesis constrained to the top passages,
    /// degrading to the trimmed nearest passage when the model fails or
    /// produces nothing
    async fn composed_answer(&self, question: &str, passages: &[ScoredPassage]) -> String {
        let context = PromptBuilder::build_context(passages);
        let prompt = PromptBuilder::build_answer_prompt(question, &context);

        match self.llm.generate(&prompt).await {
            Ok(raw) if !raw.trim().is_empty() => raw.trim().to_string(),
            Ok(_) => {
                tracing::warn!("Generation returned an empty answer, using top passage");
                self.clause_answer(passages)
            }
            Err(e) => {
                tracing::warn!("Generation failed, using top passage: {}", e);
                self.clause_answer(passages)
            }
        }
    }
}

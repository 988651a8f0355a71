//! Prompt templates for answer synthesis

use crate::retrieval::ScoredPassage;
use crate::types::response::PASSAGE_SEPARATOR;

/// Maximum number of passages included in a compose prompt
pub const MAX_CONTEXT_PASSAGES: usize = 2;

/// Prompt builder for compose-mode answers
pub struct PromptBuilder;

impl PromptBuilder {
    /// Join the top passages into a context block
    pub fn build_context(passages: &[ScoredPassage]) -> String {
        passages
            .iter()
            .take(MAX_CONTEXT_PASSAGES)
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join(PASSAGE_SEPARATOR)
    }

    /// Build the bounded answer prompt
    ///
    /// The generation model is constrained to the provided content and to a
    /// short answer; citations are rendered separately, never by the model.
    pub fn build_answer_prompt(question: &str, context: &str) -> String {
        format!(
            r#"You are a document assistant. Answer the question in 1-2 sentences (max 80 words) using ONLY the content below. Be precise and natural; do not include citations.

Question: {question}

Context:
{context}
"#,
            question = question,
            context = context
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn passage(text: &str) -> ScoredPassage {
        ScoredPassage {
            text: text.to_string(),
            similarity: 0.9,
            distance: 0.2,
        }
    }

    #[test]
    fn context_takes_at_most_two_passages() {
        let passages = vec![passage("one"), passage("two"), passage("three")];
        let context = PromptBuilder::build_context(&passages);
        assert_eq!(context, "one\n---\ntwo");
    }

    #[test]
    fn prompt_embeds_question_and_context() {
        let prompt = PromptBuilder::build_answer_prompt("What is covered?", "Coverage clause.");
        assert!(prompt.contains("What is covered?"));
        assert!(prompt.contains("Coverage clause."));
        assert!(prompt.contains("max 80 words"));
    }
}

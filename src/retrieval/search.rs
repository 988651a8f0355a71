//! Question-to-passage retrieval with similarity gating

use std::sync::Arc;

use crate::error::Result;
use crate::providers::CachedEmbedder;

use super::index::VectorIndex;

/// A retrieved passage with its similarity score
#[derive(Debug, Clone)]
pub struct ScoredPassage {
    /// Passage text
    pub text: String,
    /// Similarity score (0.0-1.0, higher is better)
    pub similarity: f32,
    /// Raw squared-L2 distance the score was derived from
    pub distance: f32,
}

/// Convert a squared-L2 distance over normalized embeddings to a similarity
///
/// Distance 0 maps to similarity 1, distance 2 to similarity 0, matching
/// cosine similarity on unit vectors. A non-finite distance fails closed to
/// similarity 0 so the passage is excluded rather than crashing the request.
pub fn similarity_from_distance(distance: f32) -> f32 {
    if !distance.is_finite() {
        return 0.0;
    }
    1.0 - distance / 2.0
}

/// Retriever: embeds a question and returns the qualifying passages
pub struct Retriever {
    embedder: Arc<CachedEmbedder>,
    threshold: f32,
}

impl Retriever {
    /// Create a retriever with the given similarity threshold
    pub fn new(embedder: Arc<CachedEmbedder>, threshold: f32) -> Self {
        Self {
            embedder,
            threshold,
        }
    }

    /// Retrieve up to `top_k` passages with similarity at or above the
    /// threshold, nearest first
    ///
    /// An empty result means "no relevant content" and is a normal outcome.
    pub async fn retrieve(
        &self,
        question: &str,
        index: &VectorIndex,
        top_k: usize,
    ) -> Result<Vec<ScoredPassage>> {
        let query = self.embedder.embed_cached(question).await?;
        let hits = index.search(&query, top_k);

        let mut passages = Vec::with_capacity(hits.len());
        for (text, distance) in hits {
            let similarity = similarity_from_distance(distance);
            if similarity >= self.threshold {
                passages.push(ScoredPassage {
                    text: text.to_string(),
                    similarity,
                    distance,
                });
            }
        }

        Ok(passages)
    }
}

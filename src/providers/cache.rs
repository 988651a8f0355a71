//! Process-wide embedding memoization keyed by exact text

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::Result;

use super::embedding::EmbeddingProvider;

/// Embedding provider wrapper that memoizes single-text lookups
///
/// Keys are the exact text, no normalization. Used for question embeddings;
/// bulk document embedding goes through the provider's batch path directly
/// since each passage is embedded once per index build anyway.
pub struct CachedEmbedder {
    provider: Arc<dyn EmbeddingProvider>,
    cache: DashMap<String, Vec<f32>>,
}

impl CachedEmbedder {
    /// Wrap a provider with an empty cache
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
        }
    }

    /// Get the embedding for `text`, computing and storing it on miss
    pub async fn embed_cached(&self, text: &str) -> Result<Vec<f32>> {
        if let Some(hit) = self.cache.get(text) {
            return Ok(hit.clone());
        }

        let vector = self.provider.embed(text).await?;
        self.cache.insert(text.to_string(), vector.clone());
        Ok(vector)
    }

    /// Uncached batch path for document passages
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        self.provider.embed_batch(texts).await
    }

    /// Number of memoized texts
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingEmbedder {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl EmbeddingProvider for CountingEmbedder {
        async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(vec![1.0, 0.0])
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    #[tokio::test]
    async fn repeated_lookup_hits_the_cache() {
        let provider = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(provider.clone());

        let first = cached.embed_cached("what is covered?").await.unwrap();
        let second = cached.embed_cached("what is covered?").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(cached.len(), 1);
    }

    #[tokio::test]
    async fn distinct_texts_are_distinct_keys() {
        let provider = Arc::new(CountingEmbedder {
            calls: AtomicUsize::new(0),
        });
        let cached = CachedEmbedder::new(provider.clone());

        cached.embed_cached("a question").await.unwrap();
        // Exact-text keying: trailing whitespace is a different key.
        cached.embed_cached("a question ").await.unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }
}

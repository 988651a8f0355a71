//! Answer caching keyed by (document source, normalized question, mode)

use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;

use crate::types::query::AnswerMode;

/// Cached answer with metadata
#[derive(Debug, Clone)]
struct CachedAnswer {
    /// Final answer string
    answer: String,
    /// Number of cache hits
    hit_count: u32,
}

/// Append-only answer cache for the process lifetime
///
/// One entry per unique (document source, trimmed+lowercased question, mode)
/// triple; no eviction. Keys are hashed so arbitrarily long questions and
/// source URLs stay cheap to store and compare.
#[derive(Default)]
pub struct AnswerCache {
    cache: RwLock<HashMap<String, CachedAnswer>>,
}

impl AnswerCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash the cache key triple
    fn cache_key(source: &str, question: &str, mode: AnswerMode) -> String {
        let normalized = question.trim().to_lowercase();
        let mut hasher = Sha256::new();
        hasher.update(source.as_bytes());
        hasher.update(b"\n");
        hasher.update(normalized.as_bytes());
        hasher.update(b"\n");
        hasher.update(mode.as_str().as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Get a cached answer
    pub fn get(&self, source: &str, question: &str, mode: AnswerMode) -> Option<String> {
        let key = Self::cache_key(source, question, mode);
        let mut cache = self.cache.write();

        if let Some(entry) = cache.get_mut(&key) {
            entry.hit_count += 1;
            tracing::debug!("Answer cache hit: {} (hits: {})", &key[..12], entry.hit_count);
            return Some(entry.answer.clone());
        }

        None
    }

    /// Store an answer
    pub fn put(&self, source: &str, question: &str, mode: AnswerMode, answer: String) {
        let key = Self::cache_key(source, question, mode);
        self.cache.write().insert(
            key,
            CachedAnswer {
                answer,
                hit_count: 0,
            },
        );
    }

    /// Get cache statistics
    pub fn stats(&self) -> CacheStats {
        let cache = self.cache.read();
        CacheStats {
            entries: cache.len(),
            total_hits: cache.values().map(|e| e.hit_count).sum(),
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, serde::Serialize)]
pub struct CacheStats {
    pub entries: usize,
    pub total_hits: u32,
}

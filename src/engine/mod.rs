//! Request orchestration: per-source index cache, answer cache, deadlines
//!
//! `QaEngine` is the request-level state machine. It is constructed once at
//! process start and injected into handlers; all shared mutable state lives
//! behind it rather than in ambient globals.

mod answer_cache;

pub use answer_cache::{AnswerCache, CacheStats};

use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::AnswerComposer;
use crate::ingestion::{DocumentFetcher, TextChunker};
use crate::providers::{CachedEmbedder, EmbeddingProvider, LlmProvider};
use crate::retrieval::{Retriever, VectorIndex};
use crate::types::query::AnswerMode;
use crate::types::response::QueryOutcome;

/// Wall-clock request budget measured from a monotonic clock
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    budget: Duration,
}

impl Deadline {
    /// Start the clock with the given budget
    pub fn start(budget: Duration) -> Self {
        Self {
            start: Instant::now(),
            budget,
        }
    }

    /// Whether the budget has elapsed
    pub fn exceeded(&self) -> bool {
        self.start.elapsed() >= self.budget
    }
}

/// Result of resolving the vector index for a document source
enum IndexState {
    Ready(Arc<VectorIndex>),
    DeadlineExceeded,
}

/// The question-answering pipeline over shared process-wide caches
pub struct QaEngine {
    config: RagConfig,
    chunker: TextChunker,
    fetcher: Arc<dyn DocumentFetcher>,
    embedder: Arc<CachedEmbedder>,
    retriever: Retriever,
    composer: AnswerComposer,
    /// Document source identity -> its vector index, built at most once
    index_cache: DashMap<String, Arc<VectorIndex>>,
    /// Per-source build locks guaranteeing the at-most-once build
    build_locks: DashMap<String, Arc<Mutex<()>>>,
    /// (source, normalized question, mode) -> final answer
    answers: AnswerCache,
}

impl QaEngine {
    /// Create the engine from configuration and capability implementations
    pub fn new(
        config: RagConfig,
        fetcher: Arc<dyn DocumentFetcher>,
        embedding: Arc<dyn EmbeddingProvider>,
        llm: Arc<dyn LlmProvider>,
    ) -> Self {
        let chunker = TextChunker::new(&config.chunking);
        let embedder = Arc::new(CachedEmbedder::new(embedding));
        let retriever = Retriever::new(
            Arc::clone(&embedder),
            config.retrieval.similarity_threshold,
        );
        let composer = AnswerComposer::new(llm, config.answer.clone());

        Self {
            config,
            chunker,
            fetcher,
            embedder,
            retriever,
            composer,
            index_cache: DashMap::new(),
            build_locks: DashMap::new(),
            answers: AnswerCache::new(),
        }
    }

    /// Answer a batch of questions about one document, one outcome per
    /// question in input order
    ///
    /// Fetch failures and empty documents reject the request; everything
    /// downstream of a built index degrades into well-formed outcomes.
    pub async fn answer_questions(
        &self,
        source: &str,
        questions: &[String],
        mode: AnswerMode,
    ) -> Result<Vec<QueryOutcome>> {
        let deadline = Deadline::start(self.config.processing.request_budget());

        let index = match self.index_for(source, &deadline).await? {
            IndexState::Ready(index) => index,
            IndexState::DeadlineExceeded => {
                tracing::warn!("Deadline elapsed while indexing {}", source);
                return Ok(questions.iter().map(|_| QueryOutcome::timeout()).collect());
            }
        };

        let mut outcomes = Vec::with_capacity(questions.len());
        for question in questions {
            outcomes.push(self.answer_one(source, question, mode, &index, &deadline).await);
        }

        Ok(outcomes)
    }

    /// Resolve the vector index for `source`, building it at most once
    async fn index_for(&self, source: &str, deadline: &Deadline) -> Result<IndexState> {
        if let Some(index) = self.index_cache.get(source).map(|e| e.value().clone()) {
            return Ok(IndexState::Ready(index));
        }

        // Exclusive per-source build lock: concurrent requests for the same
        // uncached source serialize here and all but one reuse the result.
        let lock = self
            .build_locks
            .entry(source.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        let _guard = lock.lock().await;

        if let Some(index) = self.index_cache.get(source).map(|e| e.value().clone()) {
            return Ok(IndexState::Ready(index));
        }

        if deadline.exceeded() {
            return Ok(IndexState::DeadlineExceeded);
        }

        let text = self.fetcher.fetch_text(source).await?;

        if deadline.exceeded() {
            return Ok(IndexState::DeadlineExceeded);
        }

        let passages = self.chunker.chunk(&text);
        if passages.is_empty() {
            return Err(Error::EmptyDocument(source.to_string()));
        }

        if deadline.exceeded() {
            return Ok(IndexState::DeadlineExceeded);
        }

        let vectors = self.embedder.embed_batch(&passages).await?;

        let mut index = VectorIndex::new();
        for (vector, passage) in vectors.into_iter().zip(passages) {
            index.add(vector, passage);
        }

        tracing::info!(
            "Indexed {} with {} passages ({}d vectors)",
            source,
            index.len(),
            index.dimensions().unwrap_or(0)
        );

        let index = Arc::new(index);
        self.index_cache.insert(source.to_string(), Arc::clone(&index));
        Ok(IndexState::Ready(index))
    }

    /// Answer one question against a ready index
    async fn answer_one(
        &self,
        source: &str,
        question: &str,
        mode: AnswerMode,
        index: &VectorIndex,
        deadline: &Deadline,
    ) -> QueryOutcome {
        if let Some(answer) = self.answers.get(source, question, mode) {
            return QueryOutcome::cached(answer);
        }

        if deadline.exceeded() {
            return QueryOutcome::timeout();
        }

        // Clause mode cares about the single best match; compose reads at
        // most two passages.
        let top_k = match mode {
            AnswerMode::Clause => self.config.retrieval.top_k,
            AnswerMode::Compose => self.config.retrieval.top_k.clamp(1, 2),
        };

        let passages = match self.retriever.retrieve(question, index, top_k).await {
            Ok(passages) => passages,
            Err(e) => {
                // A question-embedding hiccup degrades instead of failing the
                // request; there is nothing retrieved to answer from.
                tracing::warn!("Retrieval failed for {:?}: {}", question, e);
                let outcome = QueryOutcome::not_found();
                self.answers.put(source, question, mode, outcome.answer.clone());
                return outcome;
            }
        };

        if passages.is_empty() {
            let outcome = QueryOutcome::not_found();
            self.answers.put(source, question, mode, outcome.answer.clone());
            return outcome;
        }

        if deadline.exceeded() {
            return QueryOutcome::timeout();
        }

        let answer = self.composer.compose(question, &passages, mode).await;
        self.answers.put(source, question, mode, answer.clone());

        let matched = passages.into_iter().map(|p| p.text).collect();
        QueryOutcome::answered(answer, matched)
    }

    /// Engine configuration
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Answer cache statistics
    pub fn answer_cache_stats(&self) -> CacheStats {
        self.answers.stats()
    }

    /// Number of documents indexed so far
    pub fn indexed_documents(&self) -> usize {
        self.index_cache.len()
    }

    /// Number of memoized question embeddings
    pub fn cached_embeddings(&self) -> usize {
        self.embedder.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const DOC_TEXT: &str = "Grace period is thirty days. Claims must be filed within 30 days.";
    const SOURCE: &str = "https://example.com/policy.pdf";

    struct StaticFetcher {
        text: String,
        calls: AtomicUsize,
    }

    impl StaticFetcher {
        fn new(text: &str) -> Arc<Self> {
            Arc::new(Self {
                text: text.to_string(),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl DocumentFetcher for StaticFetcher {
        async fn fetch_text(&self, _source: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.text.clone())
        }
    }

    /// Deterministic embedder: passages and questions about the grace
    /// period share one axis, everything else is orthogonal to it.
    struct KeywordEmbedder {
        single_calls: AtomicUsize,
        batch_calls: AtomicUsize,
    }

    impl KeywordEmbedder {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                single_calls: AtomicUsize::new(0),
                batch_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl EmbeddingProvider for KeywordEmbedder {
        async fn embed(&self, text: &str) -> Result<Vec<f32>> {
            self.single_calls.fetch_add(1, Ordering::SeqCst);
            if text.to_lowercase().contains("grace") {
                Ok(vec![1.0, 0.0])
            } else {
                Ok(vec![0.0, 1.0])
            }
        }

        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            self.batch_calls.fetch_add(1, Ordering::SeqCst);
            let mut vectors = Vec::with_capacity(texts.len());
            for text in texts {
                vectors.push(if text.to_lowercase().contains("grace") {
                    vec![1.0, 0.0]
                } else {
                    vec![0.0, 1.0]
                });
            }
            Ok(vectors)
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "keyword"
        }
    }

    struct CountingLlm {
        calls: AtomicUsize,
        response: String,
    }

    impl CountingLlm {
        fn new(response: &str) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                response: response.to_string(),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for CountingLlm {
        async fn generate(&self, _prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.response.clone())
        }

        async fn health_check(&self) -> Result<bool> {
            Ok(true)
        }

        fn name(&self) -> &str {
            "counting"
        }

        fn model(&self) -> &str {
            "counting"
        }
    }

    fn engine_with(
        config: RagConfig,
        fetcher: Arc<StaticFetcher>,
        embedder: Arc<KeywordEmbedder>,
        llm: Arc<CountingLlm>,
    ) -> QaEngine {
        QaEngine::new(config, fetcher, embedder, llm)
    }

    fn question(text: &str) -> Vec<String> {
        vec![text.to_string()]
    }

    #[tokio::test]
    async fn clause_mode_returns_matching_clause() {
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(DOC_TEXT),
            KeywordEmbedder::new(),
            CountingLlm::new("unused"),
        );

        let outcomes = engine
            .answer_questions(SOURCE, &question("What is the grace period?"), AnswerMode::Clause)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].answer.contains("thirty days"));
        assert!(!outcomes[0].answer.is_empty());
        assert!(!outcomes[0].matched_passages.is_empty());
    }

    #[tokio::test]
    async fn index_is_built_at_most_once_per_source() {
        let fetcher = StaticFetcher::new(DOC_TEXT);
        let embedder = KeywordEmbedder::new();
        let engine = engine_with(
            RagConfig::default(),
            Arc::clone(&fetcher),
            Arc::clone(&embedder),
            CountingLlm::new("unused"),
        );

        for _ in 0..3 {
            engine
                .answer_questions(SOURCE, &question("What is the grace period?"), AnswerMode::Clause)
                .await
                .unwrap();
        }

        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.batch_calls.load(Ordering::SeqCst), 1);
        assert_eq!(engine.indexed_documents(), 1);
    }

    #[tokio::test]
    async fn repeated_triple_reuses_the_answer() {
        let embedder = KeywordEmbedder::new();
        let llm = CountingLlm::new("The grace period is thirty days.");
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(DOC_TEXT),
            Arc::clone(&embedder),
            Arc::clone(&llm),
        );

        let first = engine
            .answer_questions(SOURCE, &question("What is the grace period?"), AnswerMode::Compose)
            .await
            .unwrap();
        let single_after_first = embedder.single_calls.load(Ordering::SeqCst);

        // Case/whitespace variants of the question are the same cache key.
        let second = engine
            .answer_questions(
                SOURCE,
                &question("  WHAT IS THE GRACE PERIOD? "),
                AnswerMode::Compose,
            )
            .await
            .unwrap();

        assert_eq!(first[0].answer, second[0].answer);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
        assert_eq!(embedder.single_calls.load(Ordering::SeqCst), single_after_first);
        assert_eq!(engine.answer_cache_stats().total_hits, 1);
    }

    #[tokio::test]
    async fn distinct_modes_are_distinct_cache_entries() {
        let llm = CountingLlm::new("Synthesized answer.");
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(DOC_TEXT),
            KeywordEmbedder::new(),
            Arc::clone(&llm),
        );

        let clause = engine
            .answer_questions(SOURCE, &question("What is the grace period?"), AnswerMode::Clause)
            .await
            .unwrap();
        let compose = engine
            .answer_questions(SOURCE, &question("What is the grace period?"), AnswerMode::Compose)
            .await
            .unwrap();

        assert_ne!(clause[0].answer, compose[0].answer);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unrelated_question_yields_not_found_without_generation() {
        let llm = CountingLlm::new("should never run");
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(DOC_TEXT),
            KeywordEmbedder::new(),
            Arc::clone(&llm),
        );

        // The question embeds orthogonally to every passage: similarity 0.
        let outcomes = engine
            .answer_questions(SOURCE, &question("What about dental coverage?"), AnswerMode::Compose)
            .await
            .unwrap();

        assert_eq!(
            outcomes[0].answer,
            crate::types::response::NO_RELEVANT_CONTENT
        );
        assert!(outcomes[0].matched_passages.is_empty());
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn exhausted_budget_times_out_before_fetching() {
        let fetcher = StaticFetcher::new(DOC_TEXT);
        let mut config = RagConfig::default();
        config.processing.request_timeout_secs = 0;

        let engine = engine_with(
            config,
            Arc::clone(&fetcher),
            KeywordEmbedder::new(),
            CountingLlm::new("unused"),
        );

        let outcomes = engine
            .answer_questions(
                SOURCE,
                &["q1".to_string(), "q2".to_string()],
                AnswerMode::Clause,
            )
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| o.is_timeout()));
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_document_is_rejected() {
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(""),
            KeywordEmbedder::new(),
            CountingLlm::new("unused"),
        );

        let result = engine
            .answer_questions(SOURCE, &question("anything"), AnswerMode::Clause)
            .await;

        assert!(matches!(result, Err(Error::EmptyDocument(_))));
    }

    #[tokio::test]
    async fn answers_preserve_question_order() {
        let engine = engine_with(
            RagConfig::default(),
            StaticFetcher::new(DOC_TEXT),
            KeywordEmbedder::new(),
            CountingLlm::new("unused"),
        );

        let questions = vec![
            "What is the grace period?".to_string(),
            "What about dental coverage?".to_string(),
        ];
        let outcomes = engine
            .answer_questions(SOURCE, &questions, AnswerMode::Clause)
            .await
            .unwrap();

        assert_eq!(outcomes.len(), 2);
        assert!(outcomes[0].answer.contains("thirty days"));
        assert_eq!(
            outcomes[1].answer,
            crate::types::response::NO_RELEVANT_CONTENT
        );
    }
}

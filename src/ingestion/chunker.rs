//! Text chunking with two policies: fixed sliding windows and sentence packing

use regex::Regex;

use crate::config::ChunkingConfig;

/// Chunking policy shared across the whole process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// Sliding character windows of `chunk_size` with `chunk_overlap` overlap
    FixedWindow,
    /// Greedy packing of whole sentences up to `chunk_size` characters
    SentenceAware,
}

/// Text chunker with configurable size, overlap, and policy
pub struct TextChunker {
    chunk_size: usize,
    overlap: usize,
    policy: ChunkPolicy,
    sentence_end: Regex,
}

impl TextChunker {
    /// Create a chunker from configuration
    pub fn new(config: &ChunkingConfig) -> Self {
        let policy = if config.sentence_aware {
            ChunkPolicy::SentenceAware
        } else {
            ChunkPolicy::FixedWindow
        };
        Self::with_policy(config.chunk_size, config.chunk_overlap, policy)
    }

    /// Create a chunker with explicit parameters
    pub fn with_policy(chunk_size: usize, overlap: usize, policy: ChunkPolicy) -> Self {
        Self {
            chunk_size,
            overlap,
            policy,
            // A sentence ends at `.`, `!`, or `?` followed by whitespace.
            sentence_end: Regex::new(r"[.!?]\s+").expect("sentence regex is valid"),
        }
    }

    /// Split text into bounded passages
    ///
    /// Empty input yields an empty list under both policies.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }
        match self.policy {
            ChunkPolicy::FixedWindow => self.chunk_fixed(text),
            ChunkPolicy::SentenceAware => self.chunk_sentences(text),
        }
    }

    /// Walk the text in windows of `chunk_size` characters; each window starts
    /// `overlap` characters before the previous end but always advances by at
    /// least one character, so the walk terminates for any overlap value.
    fn chunk_fixed(&self, text: &str) -> Vec<String> {
        if self.chunk_size == 0 {
            // Degenerate configuration: the whole text is one passage.
            return vec![text.to_string()];
        }

        let chars: Vec<char> = text.chars().collect();
        let total = chars.len();
        let mut chunks = Vec::new();
        let mut start = 0usize;

        while start < total {
            let end = (start + self.chunk_size).min(total);
            chunks.push(chars[start..end].iter().collect());
            if end == total {
                break;
            }
            start = end.saturating_sub(self.overlap).max(start + 1);
        }

        chunks
    }

    /// Greedily pack sentences into passages of at most `chunk_size`
    /// characters. A passage always receives at least one sentence, so a
    /// single oversized sentence becomes its own passage rather than stalling
    /// the walk.
    fn chunk_sentences(&self, text: &str) -> Vec<String> {
        let sentences = self.split_sentences(text);
        if sentences.is_empty() {
            return Vec::new();
        }

        let mut chunks = Vec::new();
        let mut current: Vec<&str> = Vec::new();
        let mut current_len = 0usize;

        for sentence in sentences {
            let sentence_len = sentence.chars().count();
            if current.is_empty() || current_len + sentence_len <= self.chunk_size {
                current.push(sentence);
                current_len += sentence_len + 1;
            } else {
                chunks.push(current.join(" ").trim().to_string());
                current = vec![sentence];
                current_len = sentence_len + 1;
            }
        }

        if !current.is_empty() {
            chunks.push(current.join(" ").trim().to_string());
        }

        chunks
    }

    /// Split trimmed text at sentence boundaries, keeping the terminator with
    /// its sentence and dropping the whitespace that follows it.
    fn split_sentences<'a>(&self, text: &'a str) -> Vec<&'a str> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Vec::new();
        }

        let mut sentences = Vec::new();
        let mut last = 0usize;

        for m in self.sentence_end.find_iter(trimmed) {
            // The terminator is a single ASCII byte; cut right after it.
            let cut = m.start() + 1;
            sentences.push(&trimmed[last..cut]);
            last = m.end();
        }

        if last < trimmed.len() {
            sentences.push(&trimmed[last..]);
        }

        sentences
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed(size: usize, overlap: usize) -> TextChunker {
        TextChunker::with_policy(size, overlap, ChunkPolicy::FixedWindow)
    }

    fn sentence(size: usize) -> TextChunker {
        TextChunker::with_policy(size, 0, ChunkPolicy::SentenceAware)
    }

    #[test]
    fn empty_text_yields_no_passages() {
        assert!(fixed(100, 20).chunk("").is_empty());
        assert!(sentence(100).chunk("").is_empty());
    }

    #[test]
    fn zero_size_returns_whole_text() {
        let chunks = fixed(0, 10).chunk("some text");
        assert_eq!(chunks, vec!["some text".to_string()]);
    }

    #[test]
    fn fixed_windows_cover_text_exactly() {
        let text = "abcdefghijklmnopqrstuvwxyz0123456789";
        let overlap = 3;
        let chunks = fixed(10, overlap).chunk(text);

        // Every chunk stays within the size budget.
        assert!(chunks.iter().all(|c| c.chars().count() <= 10));

        // Dropping the overlapping prefix of each later chunk reconstructs
        // the original text.
        let mut rebuilt = chunks[0].clone();
        for chunk in &chunks[1..] {
            rebuilt.extend(chunk.chars().skip(overlap));
        }
        assert_eq!(rebuilt, text);
    }

    #[test]
    fn overlap_larger_than_size_still_terminates() {
        let text = "abcdefghij";
        let chunks = fixed(4, 100).chunk(text);
        // Window advances one char at a time; final window reaches the end.
        assert_eq!(chunks.len(), 7);
        assert_eq!(chunks.first().unwrap(), "abcd");
        assert_eq!(chunks.last().unwrap(), "ghij");
    }

    #[test]
    fn short_text_is_a_single_window() {
        assert_eq!(fixed(800, 200).chunk("short"), vec!["short".to_string()]);
    }

    #[test]
    fn sentences_pack_within_budget() {
        let text = "One fish. Two fish! Red fish? Blue fish.";
        let chunks = sentence(20).chunk(text);

        assert!(chunks.iter().all(|c| !c.is_empty()));
        // No sentence content is dropped.
        let joined = chunks.join(" ");
        for fragment in ["One fish.", "Two fish!", "Red fish?", "Blue fish."] {
            assert!(joined.contains(fragment), "missing {:?}", fragment);
        }
    }

    #[test]
    fn oversized_sentence_gets_its_own_passage() {
        let long = "a".repeat(50);
        let text = format!("Tiny. {}. Small.", long);
        let chunks = sentence(10).chunk(&text);

        assert!(chunks.iter().any(|c| c.contains(&long)));
        assert!(chunks.iter().all(|c| !c.is_empty()));
    }

    #[test]
    fn single_sentence_without_terminator_survives() {
        let chunks = sentence(100).chunk("no terminator here");
        assert_eq!(chunks, vec!["no terminator here".to_string()]);
    }
}

//! Document ingestion: fetching raw text and chunking it into passages

mod chunker;
mod fetcher;

pub use chunker::{ChunkPolicy, TextChunker};
pub use fetcher::{DocumentFetcher, HttpDocumentFetcher};

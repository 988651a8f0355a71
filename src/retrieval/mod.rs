//! Vector index and similarity-gated retrieval

mod index;
mod search;

pub use index::VectorIndex;
pub use search::{similarity_from_distance, Retriever, ScoredPassage};

//! In-memory flat vector index scoped to one document

/// One indexed passage with its embedding
struct IndexEntry {
    vector: Vec<f32>,
    passage: String,
}

/// Append-only collection of (vector, passage) pairs with k-NN search
///
/// The index dimension is fixed by the first vector added; every later add
/// must match it. Search is a linear scan over squared Euclidean distance,
/// which for normalized embeddings maps to cosine similarity via
/// `similarity = 1 - distance / 2`.
#[derive(Default)]
pub struct VectorIndex {
    dimensions: Option<usize>,
    entries: Vec<IndexEntry>,
}

impl VectorIndex {
    /// Create an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a (vector, passage) pair
    ///
    /// Panics on a dimension mismatch: mixed dimensions would silently
    /// corrupt every later search.
    pub fn add(&mut self, vector: Vec<f32>, passage: String) {
        match self.dimensions {
            None => self.dimensions = Some(vector.len()),
            Some(dims) => assert_eq!(
                vector.len(),
                dims,
                "vector dimension mismatch: index holds {}-d vectors",
                dims
            ),
        }
        self.entries.push(IndexEntry { vector, passage });
    }

    /// Number of indexed passages
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the index holds no passages
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Embedding dimension, once the first vector has been added
    pub fn dimensions(&self) -> Option<usize> {
        self.dimensions
    }

    /// Return up to `top_k` passages ordered by ascending distance
    ///
    /// `top_k` larger than the index size returns every entry; an empty
    /// index returns an empty list.
    pub fn search(&self, query: &[f32], top_k: usize) -> Vec<(&str, f32)> {
        if let Some(dims) = self.dimensions {
            assert_eq!(query.len(), dims, "query dimension mismatch");
        }

        let mut scored: Vec<(usize, f32)> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (i, squared_l2(query, &entry.vector)))
            .collect();

        scored.sort_by(|a, b| a.1.total_cmp(&b.1));
        scored.truncate(top_k);

        scored
            .into_iter()
            .map(|(i, distance)| (self.entries[i].passage.as_str(), distance))
            .collect()
    }
}

/// Squared Euclidean distance between two equal-length vectors
fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> VectorIndex {
        let mut index = VectorIndex::new();
        index.add(vec![1.0, 0.0], "east".to_string());
        index.add(vec![0.0, 1.0], "north".to_string());
        index.add(vec![-1.0, 0.0], "west".to_string());
        index
    }

    #[test]
    fn empty_index_returns_nothing() {
        let index = VectorIndex::new();
        assert!(index.search(&[1.0, 0.0], 5).is_empty());
        assert!(index.is_empty());
    }

    #[test]
    fn top_k_beyond_size_returns_all_sorted() {
        let index = sample_index();
        let results = index.search(&[1.0, 0.0], 10);

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].0, "east");
        assert_eq!(results[2].0, "west");
        // Ascending distance
        assert!(results[0].1 <= results[1].1);
        assert!(results[1].1 <= results[2].1);
    }

    #[test]
    fn self_query_is_nearest_with_zero_distance() {
        let index = sample_index();
        let results = index.search(&[0.0, 1.0], 1);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].0, "north");
        assert!(results[0].1.abs() < 1e-6);
    }

    #[test]
    fn dimension_is_fixed_by_first_vector() {
        let index = sample_index();
        assert_eq!(index.dimensions(), Some(2));
    }

    #[test]
    #[should_panic(expected = "dimension mismatch")]
    fn mismatched_add_fails_loudly() {
        let mut index = sample_index();
        index.add(vec![1.0, 2.0, 3.0], "bad".to_string());
    }
}

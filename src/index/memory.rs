//! In-memory vector index.
//!
//! Brute-force cosine over a `Vec` of records. Used by the test suite and
//! usable for small corpora loaded at startup.

use async_trait::async_trait;

use super::store::{cosine_similarity, Chunk, SearchHit, VectorIndex};
use crate::core::errors::RagError;

#[derive(Default)]
pub struct MemoryIndex {
    records: Vec<(Chunk, Vec<f32>)>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, chunk: Chunk, embedding: Vec<f32>) {
        self.records.push((chunk, embedding));
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError> {
        let mut scored: Vec<SearchHit> = self
            .records
            .iter()
            .map(|(chunk, embedding)| SearchHit {
                chunk: chunk.clone(),
                score: cosine_similarity(query_embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k.max(1));

        Ok(scored)
    }

    async fn count(&self) -> Result<usize, RagError> {
        Ok(self.records.len())
    }

    async fn dimension(&self) -> Result<Option<usize>, RagError> {
        Ok(self.records.first().map(|(_, embedding)| embedding.len()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn chunk(id: &str, content: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            content: content.to_string(),
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn empty_index_returns_no_hits() {
        let index = MemoryIndex::new();
        let hits = index.search(&[1.0, 0.0], 3).await.expect("search");
        assert!(hits.is_empty());
        assert_eq!(index.dimension().await.expect("dimension"), None);
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        let mut index = MemoryIndex::new();
        index.insert(chunk("first", "a"), vec![1.0, 0.0]);
        index.insert(chunk("second", "b"), vec![2.0, 0.0]);
        index.insert(chunk("third", "c"), vec![0.0, 1.0]);

        // first and second are colinear with the query, identical cosine
        let hits = index.search(&[1.0, 0.0], 3).await.expect("search");
        assert_eq!(hits[0].chunk.id, "first");
        assert_eq!(hits[1].chunk.id, "second");
        assert_eq!(hits[2].chunk.id, "third");
    }

    #[tokio::test]
    async fn truncates_to_k() {
        let mut index = MemoryIndex::new();
        for i in 0..5 {
            index.insert(chunk(&format!("c{i}"), "x"), vec![1.0, i as f32]);
        }
        let hits = index.search(&[1.0, 0.0], 2).await.expect("search");
        assert_eq!(hits.len(), 2);
    }
}

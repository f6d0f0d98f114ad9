//! Retrieval Engine.
//!
//! Embeds the query, asks the index for its nearest neighbors, and
//! normalizes the backend's similarity into a `[0,1]` relevance score.

use std::sync::Arc;

use crate::core::errors::RagError;
use crate::index::store::{Chunk, VectorIndex};
use crate::llm::provider::LlmProvider;

/// A chunk paired with its normalized relevance score in `[0,1]`,
/// 1 = identical.
#[derive(Debug, Clone)]
pub struct ScoredResult {
    pub chunk: Chunk,
    pub score: f32,
}

/// Strictly sorted by score descending; ties keep index insertion order.
pub type RankedResultSet = Vec<ScoredResult>;

pub struct Retriever {
    provider: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndex>,
}

impl Retriever {
    pub fn new(provider: Arc<dyn LlmProvider>, index: Arc<dyn VectorIndex>) -> Self {
        Self { provider, index }
    }

    /// Top-k nearest chunks to the query, scored and ranked.
    ///
    /// An empty index yields an empty set, not an error. An embedding
    /// failure aborts before any index query.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<RankedResultSet, RagError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(RagError::InvalidInput(
                "query must not be empty".to_string(),
            ));
        }
        if k == 0 {
            return Err(RagError::InvalidInput("k must be at least 1".to_string()));
        }

        let embeddings = self.provider.embed(&[query.to_string()]).await?;
        let query_embedding = embeddings.into_iter().next().ok_or_else(|| {
            RagError::EmbeddingFailure("provider returned no embedding".to_string())
        })?;

        // Query and index must share the embedding space; a mismatch is a
        // configuration fault, never recoverable per-query.
        if let Some(expected) = self.index.dimension().await? {
            if expected != query_embedding.len() {
                return Err(RagError::DimensionMismatch {
                    expected,
                    actual: query_embedding.len(),
                });
            }
        }

        let hits = self.index.search(&query_embedding, k).await?;

        let mut results: RankedResultSet = hits
            .into_iter()
            .map(|hit| ScoredResult {
                chunk: hit.chunk,
                // negative cosine carries no usable relevance signal
                score: hit.score.clamp(0.0, 1.0),
            })
            .collect();

        // backends already rank their hits, but clamping can introduce new
        // ties; the stable re-sort keeps the ordering contract airtight
        results.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);

        if let Some(top) = results.first() {
            tracing::debug!(
                "retrieved {} results, top score {:.3} ({})",
                results.len(),
                top.score,
                top.chunk.id
            );
        } else {
            tracing::debug!("retrieved no results for query");
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use async_trait::async_trait;

    use super::*;
    use crate::index::memory::MemoryIndex;
    use crate::llm::types::ChatRequest;

    struct FixedEmbedder {
        vector: Vec<f32>,
    }

    #[async_trait]
    impl LlmProvider for FixedEmbedder {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn health_check(&self) -> Result<bool, RagError> {
            Ok(true)
        }

        async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
            Ok(inputs.iter().map(|_| self.vector.clone()).collect())
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, RagError> {
            Ok(String::new())
        }
    }

    struct FailingEmbedder;

    #[async_trait]
    impl LlmProvider for FailingEmbedder {
        fn name(&self) -> &str {
            "failing"
        }

        async fn health_check(&self) -> Result<bool, RagError> {
            Ok(false)
        }

        async fn embed(&self, _inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
            Err(RagError::EmbeddingFailure("provider down".to_string()))
        }

        async fn chat(&self, _request: ChatRequest) -> Result<String, RagError> {
            Ok(String::new())
        }
    }

    fn chunk(id: &str) -> Chunk {
        Chunk {
            id: id.to_string(),
            content: format!("content of {id}"),
            metadata: HashMap::new(),
        }
    }

    fn retriever_over(index: MemoryIndex, vector: Vec<f32>) -> Retriever {
        Retriever::new(Arc::new(FixedEmbedder { vector }), Arc::new(index))
    }

    #[tokio::test]
    async fn rejects_empty_query() {
        let retriever = retriever_over(MemoryIndex::new(), vec![1.0]);
        let result = retriever.retrieve("   \n", 3).await;
        assert!(matches!(result, Err(RagError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn rejects_zero_k() {
        let retriever = retriever_over(MemoryIndex::new(), vec![1.0]);
        let result = retriever.retrieve("question", 0).await;
        assert!(matches!(result, Err(RagError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn empty_index_yields_empty_set() {
        let retriever = retriever_over(MemoryIndex::new(), vec![1.0, 0.0]);
        let results = retriever.retrieve("question", 3).await.expect("retrieve");
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn embedding_failure_aborts_before_search() {
        let mut index = MemoryIndex::new();
        index.insert(chunk("c1"), vec![1.0, 0.0]);
        let retriever = Retriever::new(Arc::new(FailingEmbedder), Arc::new(index));

        let result = retriever.retrieve("question", 3).await;
        assert!(matches!(result, Err(RagError::EmbeddingFailure(_))));
    }

    #[tokio::test]
    async fn dimension_mismatch_is_fatal() {
        let mut index = MemoryIndex::new();
        index.insert(chunk("c1"), vec![1.0, 0.0, 0.0]);
        let retriever = retriever_over(index, vec![1.0, 0.0]);

        let result = retriever.retrieve("question", 3).await;
        assert!(matches!(
            result,
            Err(RagError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[tokio::test]
    async fn results_are_ranked_clamped_and_truncated() {
        let mut index = MemoryIndex::new();
        index.insert(chunk("opposite"), vec![-1.0, 0.0]);
        index.insert(chunk("near"), vec![0.9, 0.1]);
        index.insert(chunk("exact"), vec![1.0, 0.0]);
        let retriever = retriever_over(index, vec![1.0, 0.0]);

        let results = retriever.retrieve("question", 2).await.expect("retrieve");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].chunk.id, "exact");
        assert_eq!(results[1].chunk.id, "near");
        for result in &results {
            assert!((0.0..=1.0).contains(&result.score));
        }
    }
}

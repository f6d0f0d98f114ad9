//! VectorIndex trait — abstract interface for index backends.
//!
//! The index is produced by a separate indexing pipeline and is read-only at
//! query time. Any backend qualifies as long as `search` returns hits with
//! "higher score = more similar" and a stable ordering for equal scores.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::core::errors::RagError;

/// Metadata key naming the originating document.
pub const SOURCE_KEY: &str = "source";

/// An indexed text fragment, the atomic unit of retrieval. Immutable once
/// indexed; the query engine only reads it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub id: String,
    pub content: String,
    /// Always carries a `source` key when the indexing pipeline behaved;
    /// may carry positional hints such as a start offset.
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(SOURCE_KEY).map(String::as_str)
    }
}

/// A chunk paired with its similarity to the query. Produced fresh per
/// query, never persisted.
#[derive(Debug, Clone)]
pub struct SearchHit {
    pub chunk: Chunk,
    /// Similarity score, higher = more similar.
    pub score: f32,
}

/// Abstract interface over index backends: in-memory brute force, an on-disk
/// store, or a remote service. Must be safe for concurrent read-only use.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Nearest neighbors to the query embedding, at most `k`, ordered by
    /// descending score with stable ties.
    async fn search(&self, query_embedding: &[f32], k: usize) -> Result<Vec<SearchHit>, RagError>;

    /// Total number of indexed chunks.
    async fn count(&self) -> Result<usize, RagError>;

    /// Embedding dimensionality of the indexed vectors, `None` when the
    /// index is empty.
    async fn dimension(&self) -> Result<Option<usize>, RagError>;
}

/// Cosine similarity, 0.0 for degenerate input.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    let denom = norm_a * norm_b;

    if denom <= f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

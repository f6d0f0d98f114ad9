//! Response Formatter.
//!
//! Pairs the generated answer with the source identifiers of the accepted
//! results. Pure and total.

use serde::{Deserialize, Serialize};

use super::retriever::RankedResultSet;

/// Placeholder for a chunk the indexing pipeline left without a source key.
pub const UNKNOWN_SOURCE: &str = "unknown";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    /// `metadata.source` per accepted result, rank order preserved.
    /// Duplicates are kept: several chunks from one document yield that
    /// document several times.
    pub sources: Vec<String>,
}

pub fn format_response(answer: String, results: &RankedResultSet) -> QueryResponse {
    let sources = results
        .iter()
        .map(|result| {
            result
                .chunk
                .source()
                .unwrap_or(UNKNOWN_SOURCE)
                .to_string()
        })
        .collect();

    QueryResponse { answer, sources }
}

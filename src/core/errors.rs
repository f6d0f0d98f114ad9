use thiserror::Error;

/// Failure taxonomy for the query pipeline.
///
/// None of these are retried inside the core; retry policy belongs to the
/// client adapters wrapping the providers. The Relevance Gate's `Rejected`
/// outcome is a normal pipeline result and deliberately not represented here.
#[derive(Debug, Error)]
pub enum RagError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("embedding failed: {0}")]
    EmbeddingFailure(String),
    #[error("index unavailable: {0}")]
    IndexUnavailable(String),
    #[error("embedding dimension mismatch: index has {expected}, query produced {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("prompt template error: {0}")]
    TemplateError(String),
    #[error("generation failed: {0}")]
    GenerationFailure(String),
    #[error("timed out: {0}")]
    Timeout(String),
    #[error("cancelled")]
    Cancelled,
}

impl RagError {
    pub fn embedding<E: std::fmt::Display>(err: E) -> Self {
        RagError::EmbeddingFailure(err.to_string())
    }

    pub fn generation<E: std::fmt::Display>(err: E) -> Self {
        RagError::GenerationFailure(err.to_string())
    }

    pub fn index<E: std::fmt::Display>(err: E) -> Self {
        RagError::IndexUnavailable(err.to_string())
    }
}

use async_trait::async_trait;

use super::types::ChatRequest;
use crate::core::errors::RagError;

/// Boundary to the embedding and generation capabilities.
///
/// Implementations must be safe for concurrent read-only use by many
/// in-flight queries. The core never retries a failed call; an adapter may
/// apply its own bounded retry before surfacing a terminal error.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "openai", "lmstudio")
    fn name(&self) -> &str;

    /// check if the provider is healthy/reachable
    async fn health_check(&self) -> Result<bool, RagError>;

    /// map each input text to a fixed-dimension embedding vector
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError>;

    /// chat completion (non-streaming)
    async fn chat(&self, request: ChatRequest) -> Result<String, RagError>;
}

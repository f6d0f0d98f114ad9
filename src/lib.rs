pub mod core;
pub mod index;
pub mod llm;
pub mod logging;
pub mod rag;

pub use crate::core::config::{AppPaths, EngineConfig};
pub use crate::core::errors::RagError;
pub use index::{Chunk, MemoryIndex, SqliteIndex, VectorIndex};
pub use llm::{LlmProvider, OpenAiProvider};
pub use rag::{QueryOutcome, QueryPipeline, QueryResponse};

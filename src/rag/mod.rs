//! Retrieval-augmented query pipeline.
//!
//! - `Retriever`: embeds the query and ranks the index's nearest chunks
//! - `RelevanceGate`: accepts or rejects the ranked set on its top score
//! - `ContextAssembler`: joins accepted contents into one bounded context
//! - `PromptBuilder`: renders the configured template
//! - `QueryPipeline`: runs the whole flow and formats the sourced answer

pub mod context_builder;
pub mod gate;
pub mod pipeline;
pub mod prompt;
pub mod response;
pub mod retriever;

pub use context_builder::ContextAssembler;
pub use gate::{GateDecision, RelevanceGate};
pub use pipeline::{QueryOutcome, QueryPipeline};
pub use prompt::PromptBuilder;
pub use response::{format_response, QueryResponse};
pub use retriever::{RankedResultSet, Retriever, ScoredResult};

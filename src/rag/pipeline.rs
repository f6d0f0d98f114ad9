//! Query pipeline orchestration.
//!
//! query → embed → retrieve → gate → assemble → prompt → generate → format.
//! One synchronous async flow per query; all intermediate state is request
//! local, so a host may run one pipeline call per in-flight request.

use std::sync::Arc;

use tokio::sync::watch;

use super::context_builder::ContextAssembler;
use super::gate::{GateDecision, RelevanceGate};
use super::prompt::PromptBuilder;
use super::response::{format_response, QueryResponse};
use super::retriever::Retriever;
use crate::core::config::EngineConfig;
use crate::core::errors::RagError;
use crate::index::store::VectorIndex;
use crate::llm::provider::LlmProvider;
use crate::llm::types::{ChatMessage, ChatRequest};

/// Outcome of one query. `NoMatch` is the gate's rejection: a normal,
/// expected result, not a fault.
#[derive(Debug)]
pub enum QueryOutcome {
    Answered {
        response: QueryResponse,
        /// The rendered prompt, kept so callers can display or log what the
        /// generation provider actually saw.
        prompt: String,
    },
    NoMatch,
}

pub struct QueryPipeline {
    retriever: Retriever,
    gate: RelevanceGate,
    assembler: ContextAssembler,
    prompt_builder: PromptBuilder,
    provider: Arc<dyn LlmProvider>,
    top_k: usize,
    temperature: f64,
    max_tokens: i32,
}

impl QueryPipeline {
    /// Wire the pipeline from validated configuration. Misconfiguration
    /// (bad threshold, bad template) fails here, before any query runs.
    pub fn new(
        config: &EngineConfig,
        provider: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Result<Self, RagError> {
        config.validate()?;

        Ok(Self {
            retriever: Retriever::new(provider.clone(), index),
            gate: RelevanceGate::new(config.retrieval.score_threshold)?,
            assembler: ContextAssembler::new(
                config.context.separator.clone(),
                config.context.max_chars,
            ),
            prompt_builder: PromptBuilder::new(config.prompt.template.clone())?,
            provider,
            top_k: config.retrieval.top_k,
            temperature: config.generation.temperature,
            max_tokens: config.generation.max_tokens,
        })
    }

    /// Answer one query end to end.
    ///
    /// On gate rejection the pipeline short-circuits: no context is built,
    /// no prompt is rendered, and the generation provider is never called.
    pub async fn answer(&self, query: &str) -> Result<QueryOutcome, RagError> {
        let results = self.retriever.retrieve(query, self.top_k).await?;

        let results = match self.gate.accept(results) {
            GateDecision::Rejected => return Ok(QueryOutcome::NoMatch),
            GateDecision::Accepted(results) => results,
        };

        let context = self.assembler.assemble(&results);
        let prompt = self.prompt_builder.build(&context, query.trim());

        let mut request = ChatRequest::new(vec![ChatMessage::user(prompt.clone())]);
        request.temperature = Some(self.temperature);
        request.max_tokens = Some(self.max_tokens);

        let answer = self.provider.chat(request).await?;
        tracing::info!("answered query from {} source chunks", results.len());

        Ok(QueryOutcome::Answered {
            response: format_response(answer, &results),
            prompt,
        })
    }

    /// Like `answer`, but aborts promptly with `Cancelled` when the caller
    /// flips the watch signal to `true`.
    pub async fn answer_with_cancel(
        &self,
        query: &str,
        mut cancel: watch::Receiver<bool>,
    ) -> Result<QueryOutcome, RagError> {
        tokio::select! {
            _ = cancel.wait_for(|cancelled| *cancelled) => Err(RagError::Cancelled),
            outcome = self.answer(query) => outcome,
        }
    }
}

//! Relevance Gate.
//!
//! Accepts or rejects a ranked result set on its top score alone. Context
//! assembly only runs when the best match already clears the threshold, so
//! weaker secondary matches ride along only behind a confident top result.

use super::retriever::RankedResultSet;
use crate::core::errors::RagError;

#[derive(Debug)]
pub enum GateDecision {
    Accepted(RankedResultSet),
    Rejected,
}

pub struct RelevanceGate {
    threshold: f32,
}

impl RelevanceGate {
    pub fn new(threshold: f32) -> Result<Self, RagError> {
        if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
            return Err(RagError::InvalidInput(format!(
                "threshold must be in [0,1], got {threshold}"
            )));
        }
        Ok(Self { threshold })
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    /// Rejected iff the set is empty or the top score is strictly below the
    /// threshold. A terminal, non-error outcome.
    pub fn accept(&self, results: RankedResultSet) -> GateDecision {
        match results.first() {
            None => GateDecision::Rejected,
            Some(top) if top.score < self.threshold => {
                tracing::info!(
                    "relevance gate rejected: top score {:.3} below threshold {:.3}",
                    top.score,
                    self.threshold
                );
                GateDecision::Rejected
            }
            Some(_) => GateDecision::Accepted(results),
        }
    }
}

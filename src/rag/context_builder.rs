//! Context Assembler.
//!
//! Joins accepted chunk contents into one context string, rank order
//! preserved, fragments separated by a fixed multi-character delimiter.

use super::retriever::RankedResultSet;

pub struct ContextAssembler {
    separator: String,
    /// 0 = uncapped.
    max_chars: usize,
}

impl ContextAssembler {
    pub fn new(separator: impl Into<String>, max_chars: usize) -> Self {
        Self {
            separator: separator.into(),
            max_chars,
        }
    }

    /// Concatenate contents in rank order. No deduplication.
    ///
    /// With a cap set, whole chunks are appended while they fit; a chunk is
    /// never split. The top-ranked chunk is always included, even when it
    /// alone exceeds the cap.
    pub fn assemble(&self, results: &RankedResultSet) -> String {
        let mut context = String::new();

        for (i, result) in results.iter().enumerate() {
            let content = result.chunk.content.as_str();

            if i > 0 && self.max_chars > 0 {
                let addition = self.separator.len() + content.len();
                if context.len() + addition > self.max_chars {
                    tracing::debug!(
                        "context cap {} reached after {} of {} chunks",
                        self.max_chars,
                        i,
                        results.len()
                    );
                    break;
                }
            }

            if i > 0 {
                context.push_str(&self.separator);
            }
            context.push_str(content);
        }

        context
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::index::store::Chunk;
    use crate::rag::retriever::ScoredResult;

    fn result(content: &str) -> ScoredResult {
        ScoredResult {
            chunk: Chunk {
                id: content.to_string(),
                content: content.to_string(),
                metadata: HashMap::new(),
            },
            score: 0.9,
        }
    }

    fn assembler() -> ContextAssembler {
        ContextAssembler::new("\n----------\n", 0)
    }

    #[test]
    fn empty_set_yields_empty_context() {
        assert_eq!(assembler().assemble(&Vec::new()), "");
    }

    #[test]
    fn single_chunk_has_no_separator() {
        let context = assembler().assemble(&vec![result("only chunk")]);
        assert_eq!(context, "only chunk");
    }

    #[test]
    fn preserves_rank_order() {
        let ab = assembler().assemble(&vec![result("A"), result("B")]);
        let ba = assembler().assemble(&vec![result("B"), result("A")]);
        assert_eq!(ab, "A\n----------\nB");
        assert_ne!(ab, ba);
    }

    #[test]
    fn keeps_duplicate_contents() {
        let context = assembler().assemble(&vec![result("same"), result("same")]);
        assert_eq!(context, "same\n----------\nsame");
    }

    #[test]
    fn cap_drops_whole_trailing_chunks() {
        let assembler = ContextAssembler::new("|", 10);
        let context = assembler.assemble(&vec![result("aaaa"), result("bbbb"), result("cccc")]);
        // "aaaa|bbbb" is 9 chars; adding "|cccc" would exceed 10
        assert_eq!(context, "aaaa|bbbb");
    }

    #[test]
    fn top_chunk_survives_even_over_cap() {
        let assembler = ContextAssembler::new("|", 3);
        let context = assembler.assemble(&vec![result("oversized"), result("x")]);
        assert_eq!(context, "oversized");
    }
}

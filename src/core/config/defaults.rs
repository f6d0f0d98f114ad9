//! Documented defaults for every configuration knob.
//!
//! The studied corpus kept these as module-level constants; here they are
//! explicit configuration with defaults so nothing is hidden process-wide.

/// Separator inserted between chunks in the assembled context. A line of
/// dashes is distinct from ordinary prose, so a reader (or the model) can
/// segment the fragments visually.
pub const SEPARATOR: &str = "\n----------\n";

/// Minimum top score for a result set to be considered usable.
pub const SCORE_THRESHOLD: f32 = 0.7;

/// Number of neighbors requested from the index per query.
pub const TOP_K: usize = 3;

/// Prompt template. Must contain both `{context}` and `{question}`.
pub const TEMPLATE: &str = "\
Answer the question using only the context below. If the context does not \
contain the answer, say you do not know.

Context:
{context}

Question: {question}
Answer:";

pub const PROVIDER_BASE_URL: &str = "http://localhost:8080";
pub const EMBED_MODEL: &str = "text-embedding";
pub const CHAT_MODEL: &str = "chat";
pub const PROVIDER_TIMEOUT_SECS: u64 = 30;
pub const PROVIDER_MAX_RETRIES: usize = 3;

pub const GENERATION_TEMPERATURE: f64 = 0.3;
pub const GENERATION_MAX_TOKENS: i32 = 1000;

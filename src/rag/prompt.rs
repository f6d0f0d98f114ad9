//! Prompt Builder.
//!
//! One fixed template with two substitution points, `{context}` and
//! `{question}`, both inserted verbatim. The template is configuration, not
//! logic; it is validated at construction so a misconfigured template
//! surfaces before any query runs.

use crate::core::errors::RagError;

pub const CONTEXT_PLACEHOLDER: &str = "{context}";
pub const QUESTION_PLACEHOLDER: &str = "{question}";

pub struct PromptBuilder {
    template: String,
}

impl PromptBuilder {
    pub fn new(template: impl Into<String>) -> Result<Self, RagError> {
        let template = template.into();
        for placeholder in [CONTEXT_PLACEHOLDER, QUESTION_PLACEHOLDER] {
            if !template.contains(placeholder) {
                return Err(RagError::TemplateError(format!(
                    "template is missing the {placeholder} placeholder"
                )));
            }
        }
        Ok(Self { template })
    }

    /// Render the prompt. Substitution is verbatim; neither the separator
    /// nor user content is escaped. A single pass over the template, so
    /// placeholder-shaped text inside the substituted values stays literal.
    pub fn build(&self, context: &str, question: &str) -> String {
        let mut out = String::with_capacity(self.template.len() + context.len() + question.len());
        let mut rest = self.template.as_str();

        loop {
            let ctx_pos = rest.find(CONTEXT_PLACEHOLDER);
            let q_pos = rest.find(QUESTION_PLACEHOLDER);
            let (pos, placeholder, value) = match (ctx_pos, q_pos) {
                (Some(c), Some(q)) if c < q => (c, CONTEXT_PLACEHOLDER, context),
                (Some(_), Some(q)) => (q, QUESTION_PLACEHOLDER, question),
                (Some(c), None) => (c, CONTEXT_PLACEHOLDER, context),
                (None, Some(q)) => (q, QUESTION_PLACEHOLDER, question),
                (None, None) => break,
            };
            out.push_str(&rest[..pos]);
            out.push_str(value);
            rest = &rest[pos + placeholder.len()..];
        }
        out.push_str(rest);
        out
    }
}

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::defaults;
use crate::core::errors::RagError;

/// Engine configuration, loaded from `config.yml`.
///
/// Every field has a documented default; a missing file yields the default
/// configuration rather than an error so the CLI works out of the box
/// against a local provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub index: IndexConfig,
    pub retrieval: RetrievalConfig,
    pub context: ContextConfig,
    pub prompt: PromptConfig,
    pub provider: ProviderConfig,
    pub generation: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IndexConfig {
    /// SQLite index file produced by the indexing pipeline. When unset the
    /// engine falls back to `AppPaths::index_path`.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetrievalConfig {
    pub top_k: usize,
    pub score_threshold: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    pub separator: String,
    /// Maximum total context length in characters. 0 = uncapped.
    pub max_chars: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptConfig {
    pub template: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub embed_model: String,
    pub chat_model: String,
    pub timeout_secs: u64,
    pub max_retries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub temperature: f64,
    pub max_tokens: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            index: IndexConfig::default(),
            retrieval: RetrievalConfig::default(),
            context: ContextConfig::default(),
            prompt: PromptConfig::default(),
            provider: ProviderConfig::default(),
            generation: GenerationConfig::default(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: defaults::TOP_K,
            score_threshold: defaults::SCORE_THRESHOLD,
        }
    }
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            separator: defaults::SEPARATOR.to_string(),
            max_chars: 0,
        }
    }
}

impl Default for PromptConfig {
    fn default() -> Self {
        Self {
            template: defaults::TEMPLATE.to_string(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::PROVIDER_BASE_URL.to_string(),
            embed_model: defaults::EMBED_MODEL.to_string(),
            chat_model: defaults::CHAT_MODEL.to_string(),
            timeout_secs: defaults::PROVIDER_TIMEOUT_SECS,
            max_retries: defaults::PROVIDER_MAX_RETRIES,
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: defaults::GENERATION_TEMPERATURE,
            max_tokens: defaults::GENERATION_MAX_TOKENS,
        }
    }
}

impl EngineConfig {
    /// Load from the given path, falling back to defaults if the file does
    /// not exist. A file that exists but fails to parse is an error, not a
    /// silent fallback.
    pub fn load(path: &Path) -> Result<Self, RagError> {
        if !path.exists() {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }

        let contents = fs::read_to_string(path)
            .map_err(|e| RagError::InvalidInput(format!("cannot read {}: {}", path.display(), e)))?;
        let config: EngineConfig = serde_yaml::from_str(&contents)
            .map_err(|e| RagError::InvalidInput(format!("cannot parse {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the pipeline cannot run with. Called on every load so
    /// misconfiguration surfaces at startup, not mid-query.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.retrieval.top_k == 0 {
            return Err(RagError::InvalidInput(
                "retrieval.top_k must be at least 1".to_string(),
            ));
        }
        let threshold = self.retrieval.score_threshold;
        if !(0.0..=1.0).contains(&threshold) || threshold.is_nan() {
            return Err(RagError::InvalidInput(format!(
                "retrieval.score_threshold must be in [0,1], got {threshold}"
            )));
        }
        if self.context.separator.is_empty() {
            return Err(RagError::InvalidInput(
                "context.separator must not be empty".to_string(),
            ));
        }
        for placeholder in ["{context}", "{question}"] {
            if !self.prompt.template.contains(placeholder) {
                return Err(RagError::TemplateError(format!(
                    "template is missing the {placeholder} placeholder"
                )));
            }
        }
        if self.provider.timeout_secs == 0 {
            return Err(RagError::InvalidInput(
                "provider.timeout_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        EngineConfig::default().validate().expect("defaults must validate");
    }

    #[test]
    fn rejects_zero_top_k() {
        let mut config = EngineConfig::default();
        config.retrieval.top_k = 0;
        assert!(matches!(config.validate(), Err(RagError::InvalidInput(_))));
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let mut config = EngineConfig::default();
        config.retrieval.score_threshold = 1.5;
        assert!(matches!(config.validate(), Err(RagError::InvalidInput(_))));
    }

    #[test]
    fn rejects_template_without_placeholders() {
        let mut config = EngineConfig::default();
        config.prompt.template = "Answer: {question}".to_string();
        assert!(matches!(config.validate(), Err(RagError::TemplateError(_))));
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = EngineConfig::load(Path::new("/nonexistent/ragline.yml"))
            .expect("missing file should not be an error");
        assert_eq!(config.retrieval.top_k, 3);
    }

    #[test]
    fn parses_partial_yaml_over_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "retrieval:\n  top_k: 5\n").expect("write config");

        let config = EngineConfig::load(&path).expect("load");
        assert_eq!(config.retrieval.top_k, 5);
        assert_eq!(config.retrieval.score_threshold, 0.7);
    }
}

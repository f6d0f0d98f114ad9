use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};

use super::provider::LlmProvider;
use super::types::ChatRequest;
use crate::core::config::service::ProviderConfig;
use crate::core::errors::RagError;

/// Adapter for OpenAI-compatible endpoints (`/v1/embeddings`,
/// `/v1/chat/completions`). Works against OpenAI itself as well as local
/// servers such as LM Studio or llama.cpp in server mode.
///
/// Applies the per-call timeout from config and bounded exponential backoff
/// for retryable statuses, then surfaces a terminal typed error.
#[derive(Clone)]
pub struct OpenAiProvider {
    base_url: String,
    embed_model: String,
    chat_model: String,
    max_retries: usize,
    client: Client,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

impl OpenAiProvider {
    pub fn new(config: &ProviderConfig) -> Result<Self, RagError> {
        let mut builder = Client::builder().timeout(Duration::from_secs(config.timeout_secs));
        if let Ok(api_key) = std::env::var("RAGLINE_API_KEY") {
            let mut headers = reqwest::header::HeaderMap::new();
            let value = reqwest::header::HeaderValue::from_str(&format!("Bearer {}", api_key.trim()))
                .map_err(|_| RagError::InvalidInput("RAGLINE_API_KEY is not a valid header value".to_string()))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
            builder = builder.default_headers(headers);
        }
        let client = builder
            .build()
            .map_err(|e| RagError::InvalidInput(format!("cannot build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            embed_model: config.embed_model.clone(),
            chat_model: config.chat_model.clone(),
            max_retries: config.max_retries.max(1),
            client,
        })
    }

    /// POST with bounded exponential backoff for retryable failures.
    async fn post_with_retry(&self, url: &str, body: &Value) -> Result<Value, ProviderCallError> {
        let mut attempt = 0usize;
        loop {
            let result = self.client.post(url).json(body).send().await;
            match result {
                Ok(resp) => {
                    let status = resp.status();
                    if status.is_success() {
                        return resp.json::<Value>().await.map_err(|e| {
                            ProviderCallError::Terminal(format!("malformed response body: {e}"))
                        });
                    }
                    let text = resp.text().await.unwrap_or_default();
                    if should_retry(status) && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(ProviderCallError::Terminal(format!("{status}: {text}")));
                }
                Err(err) if err.is_timeout() => {
                    return Err(ProviderCallError::Timeout(format!("{url}: {err}")));
                }
                Err(err) => {
                    if err.is_connect() && attempt + 1 < self.max_retries {
                        attempt += 1;
                        tokio::time::sleep(retry_backoff(attempt)).await;
                        continue;
                    }
                    return Err(ProviderCallError::Terminal(err.to_string()));
                }
            }
        }
    }
}

enum ProviderCallError {
    Timeout(String),
    Terminal(String),
}

fn should_retry(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn retry_backoff(attempt: usize) -> Duration {
    Duration::from_millis(250u64.saturating_mul(1 << attempt.min(6)))
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    fn name(&self) -> &str {
        "openai"
    }

    async fn health_check(&self) -> Result<bool, RagError> {
        let url = format!("{}/v1/models", self.base_url);
        match self.client.get(&url).send().await {
            Ok(resp) => Ok(resp.status().is_success()),
            Err(_) => Ok(false),
        }
    }

    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embed_model,
            "input": inputs,
        });

        let payload = match self.post_with_retry(&url, &body).await {
            Ok(payload) => payload,
            Err(ProviderCallError::Timeout(msg)) => return Err(RagError::Timeout(msg)),
            Err(ProviderCallError::Terminal(msg)) => return Err(RagError::EmbeddingFailure(msg)),
        };

        let mut parsed: EmbeddingResponse =
            serde_json::from_value(payload).map_err(RagError::embedding)?;
        parsed.data.sort_by_key(|entry| entry.index);

        if parsed.data.len() != inputs.len() {
            return Err(RagError::EmbeddingFailure(format!(
                "provider returned {} embeddings for {} inputs",
                parsed.data.len(),
                inputs.len()
            )));
        }

        Ok(parsed.data.into_iter().map(|entry| entry.embedding).collect())
    }

    async fn chat(&self, request: ChatRequest) -> Result<String, RagError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let mut body = json!({
            "model": self.chat_model,
            "messages": request.messages,
            "stream": false,
        });
        if let Some(obj) = body.as_object_mut() {
            if let Some(t) = request.temperature {
                obj.insert("temperature".to_string(), json!(t));
            }
            if let Some(t) = request.max_tokens {
                obj.insert("max_tokens".to_string(), json!(t));
            }
            if let Some(s) = request.stop {
                obj.insert("stop".to_string(), json!(s));
            }
        }

        let payload = match self.post_with_retry(&url, &body).await {
            Ok(payload) => payload,
            Err(ProviderCallError::Timeout(msg)) => return Err(RagError::Timeout(msg)),
            Err(ProviderCallError::Terminal(msg)) => return Err(RagError::GenerationFailure(msg)),
        };

        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|content| content.to_string())
            .ok_or_else(|| {
                RagError::GenerationFailure("response carried no message content".to_string())
            })
    }
}

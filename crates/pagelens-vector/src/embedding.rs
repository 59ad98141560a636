//! Embedding clients used to turn search text into query vectors
//!
//! Supports OpenAI-compatible and Ollama embedding APIs. The model must be
//! the one the collection was ingested with.

use async_trait::async_trait;
use pagelens_core::{ConfigError, EmbeddingConfig, EmbeddingProvider, PagelensError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Embeds query text
#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Generate the embedding for one query
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Model identifier, for logging
    fn model(&self) -> &str;
}

// ============================================================================
// OpenAI
// ============================================================================

/// OpenAI-compatible `/embeddings` client
pub struct OpenAiEmbedding {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OpenAiEmbeddingRequest<'a> {
    input: &'a str,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

impl OpenAiEmbedding {
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    /// Create from config; requires `OPENAI_API_KEY`
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = config
            .openai_api_key
            .as_ref()
            .ok_or_else(|| ConfigError::MissingRequired("OPENAI_API_KEY".to_string()))?;

        Ok(Self::new(
            api_key.clone(),
            config.model.clone(),
            config.openai_base_url.clone(),
        ))
    }

    fn endpoint(&self) -> String {
        format!("{}/embeddings", self.base_url)
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = OpenAiEmbeddingRequest {
            input: text,
            model: &self.model,
        };

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| PagelensError::EmbeddingError(format!("Embedding request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(PagelensError::EmbeddingError(format!(
                "OpenAI embedding error ({status}): {error_text}"
            )));
        }

        let result: OpenAiEmbeddingResponse = response.json().await.map_err(|e| {
            PagelensError::EmbeddingError(format!("Failed to parse embedding response: {e}"))
        })?;

        result
            .data
            .into_iter()
            .next()
            .map(|d| d.embedding)
            .ok_or_else(|| PagelensError::EmbeddingError("No embedding returned".to_string()))
    }

    fn model(&self) -> &str {
        &self.model
    }
}

// ============================================================================
// Ollama
// ============================================================================

/// Ollama `/api/embeddings` client
pub struct OllamaEmbedding {
    client: Client,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
struct OllamaEmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct OllamaEmbeddingResponse {
    embedding: Vec<f32>,
}

impl OllamaEmbedding {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &EmbeddingConfig) -> Self {
        Self::new(config.ollama_url.clone(), config.model.clone())
    }

    fn endpoint(&self) -> String {
        format!("{}/api/embeddings", self.base_url)
    }
}

#[async_trait]
impl EmbeddingClient for OllamaEmbedding {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = OllamaEmbeddingRequest {
            model: &self.model,
            prompt: text,
        };

        let response = self
            .client
            .post(self.endpoint())
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                PagelensError::EmbeddingError(format!("Ollama embedding request failed: {e}"))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(PagelensError::EmbeddingError(format!(
                "Ollama embedding error: {error_text}"
            )));
        }

        let result: OllamaEmbeddingResponse = response.json().await.map_err(|e| {
            PagelensError::EmbeddingError(format!("Failed to parse embedding response: {e}"))
        })?;

        Ok(result.embedding)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Create an embedding client from config
pub fn create_embedding_client(config: &EmbeddingConfig) -> Result<Box<dyn EmbeddingClient>> {
    match config.provider {
        EmbeddingProvider::OpenAI => Ok(Box::new(OpenAiEmbedding::from_config(config)?)),
        EmbeddingProvider::Ollama => Ok(Box::new(OllamaEmbedding::from_config(config))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints_strip_trailing_slash() {
        let openai = OpenAiEmbedding::new("k", "text-embedding-3-large", "http://proxy:8000/v1/");
        assert_eq!(openai.endpoint(), "http://proxy:8000/v1/embeddings");

        let ollama = OllamaEmbedding::new("http://localhost:11434/", "nomic-embed-text");
        assert_eq!(ollama.endpoint(), "http://localhost:11434/api/embeddings");
    }

    #[test]
    fn test_openai_request_body() {
        let body = serde_json::to_value(OpenAiEmbeddingRequest {
            input: "scope 3 emissions",
            model: "text-embedding-3-large",
        })
        .unwrap();
        assert_eq!(body["input"], "scope 3 emissions");
        assert_eq!(body["model"], "text-embedding-3-large");
    }

    #[test]
    fn test_factory_requires_openai_key() {
        let config = EmbeddingConfig::default();
        let err = create_embedding_client(&config).err().unwrap();
        assert!(matches!(err, PagelensError::ConfigError(_)));

        let config = EmbeddingConfig {
            openai_api_key: Some("sk-test".to_string()),
            ..Default::default()
        };
        let client = create_embedding_client(&config).unwrap();
        assert_eq!(client.model(), "text-embedding-3-large");
    }

    #[test]
    fn test_factory_ollama() {
        let config = EmbeddingConfig {
            provider: EmbeddingProvider::Ollama,
            model: "all-minilm".to_string(),
            ..Default::default()
        };
        let client = create_embedding_client(&config).unwrap();
        assert_eq!(client.model(), "all-minilm");
    }
}

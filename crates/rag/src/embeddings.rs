//! Text Embeddings
//!
//! The embedding provider is an opaque function from text to a fixed-size
//! dense vector. Production uses an OpenAI-compatible HTTP API; tests use
//! the deterministic hash embedder.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use bedding_agent_config::constants::{embedding, endpoints};

use crate::RagError;

/// Opaque text-to-vector provider
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embed a batch of texts, in order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    /// Vector dimensionality
    fn dim(&self) -> usize;
}

/// OpenAI-compatible embedding API configuration
#[derive(Debug, Clone)]
pub struct OpenAiEmbedderConfig {
    /// API base URL (`…/v1`)
    pub api_base: String,
    /// Bearer token
    pub api_key: String,
    /// Model name
    pub model: String,
    /// Vector dimensionality
    pub embedding_dim: usize,
}

impl Default for OpenAiEmbedderConfig {
    fn default() -> Self {
        Self {
            api_base: endpoints::EMBEDDING_API_DEFAULT.to_string(),
            api_key: String::new(),
            model: embedding::DEFAULT_MODEL.to_string(),
            embedding_dim: embedding::EMBEDDING_DIM,
        }
    }
}

/// Request to the embeddings endpoint
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

/// One embedding in the response
#[derive(Debug, Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
    index: usize,
}

/// Response from the embeddings endpoint
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

/// Embedder backed by an OpenAI-compatible `/embeddings` endpoint
pub struct OpenAiEmbedder {
    client: Client,
    config: OpenAiEmbedderConfig,
}

impl OpenAiEmbedder {
    pub fn new(config: OpenAiEmbedderConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    async fn request(&self, inputs: Vec<&str>) -> Result<Vec<Vec<f32>>, RagError> {
        let url = format!("{}/embeddings", self.config.api_base.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&EmbedRequest {
                model: &self.config.model,
                input: inputs,
            })
            .send()
            .await
            .map_err(|e| RagError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "Embedding API returned {}: {}",
                status, body
            )));
        }

        let mut parsed: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(e.to_string()))?;

        parsed.data.sort_by_key(|d| d.index);
        Ok(parsed.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl Embedder for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut embeddings = self.request(vec![text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| RagError::Embedding("Empty embedding response".to_string()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let inputs: Vec<&str> = texts.iter().map(String::as_str).collect();
        let embeddings = self.request(inputs).await?;
        if embeddings.len() != texts.len() {
            return Err(RagError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim
    }
}

/// Deterministic hash-based embedder for tests (no provider required)
pub struct SimpleEmbedder {
    dim: usize,
}

impl SimpleEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

impl Default for SimpleEmbedder {
    fn default() -> Self {
        Self::new(embedding::EMBEDDING_DIM)
    }
}

#[async_trait]
impl Embedder for SimpleEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let mut vector = vec![0.0f32; self.dim];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % self.dim;
            vector[idx] += 1.0;
        }

        let norm: f32 = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut vector {
                *v /= norm;
            }
        }

        Ok(vector)
    }

    fn dim(&self) -> usize {
        self.dim
    }
}

//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{chunking, collections, embedding, endpoints, retrieval};
use crate::ConfigError;

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    /// Store connection configuration
    #[serde(default)]
    pub store: StoreConfig,

    /// Retrieval configuration
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// Chunking configuration for crawled FAQ text
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding provider configuration
    #[serde(default)]
    pub embedding: EmbeddingSettings,
}

/// Dual index store connection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Qdrant endpoint
    #[serde(default = "default_qdrant_endpoint")]
    pub qdrant_endpoint: String,

    /// Qdrant API key (optional)
    #[serde(default)]
    pub qdrant_api_key: Option<String>,

    /// Product catalog collection name
    #[serde(default = "default_product_collection")]
    pub product_collection: String,

    /// FAQ knowledge-base collection name
    #[serde(default = "default_qa_collection")]
    pub qa_collection: String,

    /// Optional on-disk path for the full-text index (RAM when unset)
    #[serde(default)]
    pub fulltext_index_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            qdrant_endpoint: default_qdrant_endpoint(),
            qdrant_api_key: None,
            product_collection: default_product_collection(),
            qa_collection: default_qa_collection(),
            fulltext_index_path: None,
        }
    }
}

/// Hybrid retrieval and exact filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Final result cap for semantic search
    #[serde(default = "default_search_top_k")]
    pub search_top_k: usize,

    /// Result cap for the exact filter engine
    #[serde(default = "default_filter_limit")]
    pub filter_limit: usize,

    /// Rank-fusion penalty for the full-text ranking
    #[serde(default = "default_fulltext_penalty")]
    pub fulltext_penalty: f32,

    /// Rank-fusion penalty for the vector ranking
    #[serde(default = "default_vector_penalty")]
    pub vector_penalty: f32,

    /// Candidates fetched from each index before fusion
    #[serde(default = "default_candidate_pool_k")]
    pub candidate_pool_k: usize,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            search_top_k: retrieval::SEARCH_TOP_K,
            filter_limit: retrieval::FILTER_LIMIT,
            fulltext_penalty: retrieval::FULLTEXT_PENALTY,
            vector_penalty: retrieval::VECTOR_PENALTY,
            candidate_pool_k: retrieval::CANDIDATE_POOL_K,
        }
    }
}

/// Chunking of crawled FAQ text
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Target chunk content length, in characters
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Overlap carried between consecutive chunks, in characters
    #[serde(default = "default_chunk_overlap")]
    pub chunk_overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: chunking::CHUNK_SIZE,
            chunk_overlap: chunking::CHUNK_OVERLAP,
        }
    }
}

/// Embedding provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    /// OpenAI-compatible API base URL
    #[serde(default = "default_embedding_api")]
    pub api_base: String,

    /// API key (read from BEDDING_AGENT_EMBEDDING__API_KEY in deployment)
    #[serde(default)]
    pub api_key: Option<String>,

    /// Model name
    #[serde(default = "default_embedding_model")]
    pub model: String,

    /// Vector dimensionality
    #[serde(default = "default_embedding_dim")]
    pub dimension: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            api_base: default_embedding_api(),
            api_key: None,
            model: default_embedding_model(),
            dimension: embedding::EMBEDDING_DIM,
        }
    }
}

fn default_qdrant_endpoint() -> String {
    endpoints::QDRANT_DEFAULT.to_string()
}

fn default_product_collection() -> String {
    collections::PRODUCT_COLLECTION.to_string()
}

fn default_qa_collection() -> String {
    collections::QA_COLLECTION.to_string()
}

fn default_search_top_k() -> usize {
    retrieval::SEARCH_TOP_K
}

fn default_filter_limit() -> usize {
    retrieval::FILTER_LIMIT
}

fn default_fulltext_penalty() -> f32 {
    retrieval::FULLTEXT_PENALTY
}

fn default_vector_penalty() -> f32 {
    retrieval::VECTOR_PENALTY
}

fn default_candidate_pool_k() -> usize {
    retrieval::CANDIDATE_POOL_K
}

fn default_chunk_size() -> usize {
    chunking::CHUNK_SIZE
}

fn default_chunk_overlap() -> usize {
    chunking::CHUNK_OVERLAP
}

fn default_embedding_api() -> String {
    endpoints::EMBEDDING_API_DEFAULT.to_string()
}

fn default_embedding_dim() -> usize {
    embedding::EMBEDDING_DIM
}

fn default_embedding_model() -> String {
    embedding::DEFAULT_MODEL.to_string()
}

impl Settings {
    /// Load settings from an optional file plus environment overrides.
    ///
    /// Environment variables use the `BEDDING_AGENT_` prefix with `__` as the
    /// section separator, e.g. `BEDDING_AGENT_STORE__QDRANT_ENDPOINT`.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            builder = builder.add_source(File::from(path));
        }

        builder = builder.add_source(
            Environment::with_prefix("BEDDING_AGENT")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .map_err(|e| ConfigError::Load(e.to_string()))?
            .try_deserialize()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Sanity checks on loaded values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.retrieval.search_top_k == 0 {
            return Err(ConfigError::Invalid(
                "retrieval.search_top_k must be at least 1".to_string(),
            ));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(ConfigError::Invalid(
                "chunking.chunk_overlap must be smaller than chunk_size".to_string(),
            ));
        }
        if self.embedding.dimension == 0 {
            return Err(ConfigError::Invalid(
                "embedding.dimension must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let settings = Settings::default();
        assert_eq!(settings.retrieval.search_top_k, retrieval::SEARCH_TOP_K);
        assert_eq!(settings.retrieval.fulltext_penalty, 50.0);
        assert_eq!(settings.retrieval.vector_penalty, 50.0);
        assert_eq!(settings.chunking.chunk_size, 500);
        assert_eq!(settings.chunking.chunk_overlap, 100);
        assert_eq!(settings.embedding.dimension, 1536);
    }

    #[test]
    fn validate_rejects_bad_overlap() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            "[retrieval]\nsearch_top_k = 10\n\n[store]\nproduct_collection = \"catalog_test\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.retrieval.search_top_k, 10);
        assert_eq!(settings.store.product_collection, "catalog_test");
        // Untouched sections keep their defaults
        assert_eq!(settings.retrieval.filter_limit, retrieval::FILTER_LIMIT);
    }
}

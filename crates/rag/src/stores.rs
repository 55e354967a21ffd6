//! Shared store handle
//!
//! One lazily created Qdrant connection per corpus, shared across concurrent
//! requests. Initialization is guarded so concurrent first callers wait on a
//! single connection attempt instead of racing to create duplicates.

use std::sync::Arc;
use tokio::sync::OnceCell;

use bedding_agent_config::StoreConfig;

use crate::vector_store::{VectorStore, VectorStoreConfig};
use crate::RagError;

/// Process-wide store handle, constructed once and passed to the components
/// that need it (never ambient module state).
pub struct SharedStores {
    config: StoreConfig,
    product_vectors: OnceCell<Arc<VectorStore>>,
    qa_vectors: OnceCell<Arc<VectorStore>>,
}

impl SharedStores {
    pub fn new(config: StoreConfig) -> Self {
        Self {
            config,
            product_vectors: OnceCell::new(),
            qa_vectors: OnceCell::new(),
        }
    }

    /// Vector store for the product catalog corpus
    pub async fn product_vectors(&self) -> Result<Arc<VectorStore>, RagError> {
        self.product_vectors
            .get_or_try_init(|| self.connect(&self.config.product_collection))
            .await
            .cloned()
    }

    /// Vector store for the FAQ knowledge-base corpus
    pub async fn qa_vectors(&self) -> Result<Arc<VectorStore>, RagError> {
        self.qa_vectors
            .get_or_try_init(|| self.connect(&self.config.qa_collection))
            .await
            .cloned()
    }

    async fn connect(&self, collection: &str) -> Result<Arc<VectorStore>, RagError> {
        let store = VectorStore::new(VectorStoreConfig {
            endpoint: self.config.qdrant_endpoint.clone(),
            collection: collection.to_string(),
            api_key: self.config.qdrant_api_key.clone(),
            ..VectorStoreConfig::default()
        })?;

        store.ensure_collection().await?;
        tracing::info!(collection, "Vector store connection established");

        Ok(Arc::new(store))
    }
}

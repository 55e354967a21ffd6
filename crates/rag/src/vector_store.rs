//! Vector Store using Qdrant
//!
//! Dense vector storage and similarity search for both corpora.

use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use async_trait::async_trait;
use qdrant_client::{
    qdrant::{
        value::Kind, CreateCollectionBuilder, Distance, PointStruct, SearchPointsBuilder,
        UpsertPointsBuilder, VectorParamsBuilder,
    },
    Qdrant,
};
use serde::{Deserialize, Serialize};

use bedding_agent_config::constants::{embedding, endpoints};

use crate::RagError;

/// Vector store configuration
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    /// Qdrant endpoint
    pub endpoint: String,
    /// Collection name
    pub collection: String,
    /// Vector dimension
    pub vector_dim: usize,
    /// API key (optional)
    pub api_key: Option<String>,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::QDRANT_DEFAULT.to_string(),
            collection: "product_data".to_string(),
            vector_dim: embedding::EMBEDDING_DIM,
            api_key: None,
        }
    }
}

/// Document pushed into the dual index.
///
/// `metadata` carries the structured attributes the retrieval layer needs at
/// query time: `product_name`/`category` for catalog documents, `source`/`url`
/// for FAQ chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexDocument {
    /// Stable document identity
    pub id: String,
    /// Embeddable text
    pub content: String,
    /// Structured string attributes
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// One ranked candidate from a dense search
#[derive(Debug, Clone)]
pub struct DenseHit {
    pub id: String,
    pub score: f32,
    pub content: String,
    pub metadata: HashMap<String, String>,
}

/// Seam over the dense similarity query so retrieval logic can be exercised
/// without a live Qdrant instance.
#[async_trait]
pub trait DenseIndex: Send + Sync {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<DenseHit>, RagError>;
}

/// Write-side seam, same rationale as [`DenseIndex`]
#[async_trait]
pub trait DenseWriter: Send + Sync {
    async fn upsert(
        &self,
        documents: &[IndexDocument],
        embeddings: &[Vec<f32>],
    ) -> Result<(), RagError>;
}

/// Vector store client
pub struct VectorStore {
    client: Qdrant,
    config: VectorStoreConfig,
}

impl VectorStore {
    /// Create a new vector store connection
    pub fn new(config: VectorStoreConfig) -> Result<Self, RagError> {
        let mut builder = Qdrant::from_url(&config.endpoint);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
            tracing::info!("Qdrant connection using API key authentication");
        }

        let client = builder
            .build()
            .map_err(|e| RagError::Connection(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create the collection if it does not exist
    pub async fn ensure_collection(&self) -> Result<(), RagError> {
        let exists = self
            .client
            .collection_exists(&self.config.collection)
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        if !exists {
            self.client
                .create_collection(
                    CreateCollectionBuilder::new(&self.config.collection).vectors_config(
                        VectorParamsBuilder::new(self.config.vector_dim as u64, Distance::Cosine),
                    ),
                )
                .await
                .map_err(|e| RagError::VectorStore(e.to_string()))?;
        }

        Ok(())
    }

    /// Bulk insert documents with their embeddings.
    ///
    /// Re-inserting a document with the same id overwrites the previous
    /// point, so full rebuilds are idempotent by identity.
    pub async fn upsert(
        &self,
        documents: &[IndexDocument],
        embeddings: &[Vec<f32>],
    ) -> Result<(), RagError> {
        if documents.len() != embeddings.len() {
            return Err(RagError::VectorStore(
                "Document and embedding count mismatch".to_string(),
            ));
        }

        let points: Vec<PointStruct> = documents
            .iter()
            .zip(embeddings.iter())
            .map(|(doc, emb)| {
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("id".to_string(), doc.id.clone().into());
                payload.insert("content".to_string(), doc.content.clone().into());

                for (k, v) in &doc.metadata {
                    payload.insert(k.clone(), v.clone().into());
                }

                // Qdrant point ids are numeric or UUID; document ids are
                // arbitrary strings, so the point id is a stable hash and
                // the real id travels in the payload.
                PointStruct::new(point_id(&doc.id), emb.clone(), payload)
            })
            .collect();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.config.collection, points))
            .await
            .map_err(|e| RagError::VectorStore(e.to_string()))?;

        Ok(())
    }

    /// Ranked dense similarity search
    async fn search_points(
        &self,
        query_embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<DenseHit>, RagError> {
        let results = self
            .client
            .search_points(
                SearchPointsBuilder::new(
                    &self.config.collection,
                    query_embedding.to_vec(),
                    top_k as u64,
                )
                .with_payload(true),
            )
            .await
            .map_err(|e| RagError::Search(e.to_string()))?;

        let hits = results
            .result
            .into_iter()
            .map(|point| {
                let mut metadata = HashMap::new();
                let mut content = String::new();
                let mut id = String::new();

                for (k, v) in point.payload {
                    if let Some(Kind::StringValue(s)) = v.kind {
                        match k.as_str() {
                            "id" => id = s,
                            "content" => content = s,
                            _ => {
                                metadata.insert(k, s);
                            },
                        }
                    }
                }

                DenseHit {
                    id,
                    score: point.score,
                    content,
                    metadata,
                }
            })
            .collect();

        Ok(hits)
    }
}

#[async_trait]
impl DenseIndex for VectorStore {
    async fn search(&self, embedding: &[f32], top_k: usize) -> Result<Vec<DenseHit>, RagError> {
        self.search_points(embedding, top_k).await
    }
}

#[async_trait]
impl DenseWriter for VectorStore {
    async fn upsert(
        &self,
        documents: &[IndexDocument],
        embeddings: &[Vec<f32>],
    ) -> Result<(), RagError> {
        VectorStore::upsert(self, documents, embeddings).await
    }
}

/// Stable numeric point id for an arbitrary string document id
fn point_id(id: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

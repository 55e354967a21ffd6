//! Hybrid retrieval engine for the bedding retailer chatbot
//!
//! Features:
//! - Dense vector search via Qdrant
//! - Full-text search via Tantivy
//! - Penalized rank fusion of the two rankings
//! - Structured post-filters applied after fusion
//! - Deterministic exact filter engine over the normalized catalog store
//! - Fixed-size overlapping chunking for crawled FAQ text
//! - Single-writer full-rebuild index writer

pub mod catalog_store;
pub mod chunker;
pub mod embeddings;
pub mod filter;
pub mod index_writer;
pub mod retriever;
pub mod sparse_search;
pub mod stores;
pub mod vector_store;

pub use catalog_store::CatalogStore;
pub use chunker::{Chunk, ChunkConfig, TextChunker};
pub use embeddings::{Embedder, OpenAiEmbedder, OpenAiEmbedderConfig, SimpleEmbedder};
pub use filter::{ExactFilterEngine, FilterConfig, ProductFilterResult};
pub use index_writer::IndexWriter;
pub use retriever::{
    CorpusIndexes, HybridRetriever, ProductFilters, ProductSearchResult, QaSearchResult,
    RetrieverConfig,
};
pub use sparse_search::{SparseConfig, SparseHit, SparseIndex};
pub use stores::SharedStores;
pub use vector_store::{
    DenseHit, DenseIndex, DenseWriter, IndexDocument, VectorStore, VectorStoreConfig,
};

use thiserror::Error;

/// Retrieval errors.
///
/// Store unavailability is fatal for the calling operation and propagates;
/// a query matching nothing is NOT an error (callers receive the synthetic
/// placeholder result instead).
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Vector store error: {0}")]
    VectorStore(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Connection error: {0}")]
    Connection(String),
}

impl From<RagError> for bedding_agent_core::Error {
    fn from(err: RagError) -> Self {
        bedding_agent_core::Error::Retrieval(err.to_string())
    }
}

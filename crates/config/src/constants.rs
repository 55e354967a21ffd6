//! Centralized constants
//!
//! Single source of truth for retrieval, chunking and embedding tunables.
//! Settings defaults and component configs read from here instead of
//! hardcoding values in multiple files.

/// Retrieval tunables
pub mod retrieval {
    /// Final result cap for semantic search
    pub const SEARCH_TOP_K: usize = 5;

    /// Result cap for the exact filter engine
    pub const FILTER_LIMIT: usize = 100;

    /// Rank-fusion penalty for the full-text ranking
    pub const FULLTEXT_PENALTY: f32 = 50.0;

    /// Rank-fusion penalty for the vector ranking
    pub const VECTOR_PENALTY: f32 = 50.0;

    /// Candidates fetched from each underlying index before fusion.
    /// Larger than the final top-k so post-filters have room to discard.
    pub const CANDIDATE_POOL_K: usize = 20;
}

/// Embedding provider
pub mod embedding {
    /// Dense vector dimensionality (text-embedding-3-small)
    pub const EMBEDDING_DIM: usize = 1536;

    /// Default embedding model name
    pub const DEFAULT_MODEL: &str = "text-embedding-3-small";
}

/// Chunking of crawled FAQ text
pub mod chunking {
    /// Target chunk content length, in characters
    pub const CHUNK_SIZE: usize = 500;

    /// Overlap carried between consecutive chunks, in characters
    pub const CHUNK_OVERLAP: usize = 100;
}

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Qdrant vector store endpoint
    pub const QDRANT_DEFAULT: &str = "http://127.0.0.1:6334";

    /// OpenAI-compatible embedding API base
    pub const EMBEDDING_API_DEFAULT: &str = "https://api.openai.com/v1";
}

/// Index naming
pub mod collections {
    /// Qdrant collection / Tantivy corpus for the product catalog
    pub const PRODUCT_COLLECTION: &str = "product_data";

    /// Qdrant collection / Tantivy corpus for the FAQ knowledge base
    pub const QA_COLLECTION: &str = "qa_data";
}

//! Hybrid Retriever
//!
//! Answers a natural-language query against one corpus by fusing a full-text
//! ranking and a dense-vector ranking into one ordering, then applying
//! structured post-filters. Filtering happens strictly after fusion: a
//! pre-filter would shift each list's rank positions and bias the rank-based
//! fusion scores.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use bedding_agent_config::constants::retrieval;
use bedding_agent_core::{CanonicalDocument, PriceRange, QAEntry, Variant};

use crate::catalog_store::CatalogStore;
use crate::embeddings::Embedder;
use crate::sparse_search::{SparseHit, SparseIndex};
use crate::vector_store::{DenseHit, DenseIndex};
use crate::RagError;

/// Fallback source tag for the synthetic no-match FAQ record
pub const QA_FALLBACK_SOURCE: &str = "系統預設";

const QA_NO_MATCH_MESSAGE: &str = "很抱歉，我無法在現有的資料中找到與您問題相關的資訊。\
建議您直接聯繫我們的客服部門，他們將為您提供更詳細的協助。";

const PRODUCT_NO_MATCH_MESSAGE: &str = "很抱歉，我無法在現有的資料中找到與您問題相關的產品。\
建議您直接聯繫我們的客服部門，他們將為您提供更詳細的協助。";

/// Retriever configuration
#[derive(Debug, Clone)]
pub struct RetrieverConfig {
    /// Final result cap for semantic search
    pub top_k: usize,
    /// Candidates fetched from each index before fusion
    pub candidate_pool_k: usize,
    /// Rank-fusion penalty for the full-text ranking
    pub fulltext_penalty: f32,
    /// Rank-fusion penalty for the vector ranking
    pub vector_penalty: f32,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            top_k: retrieval::SEARCH_TOP_K,
            candidate_pool_k: retrieval::CANDIDATE_POOL_K,
            fulltext_penalty: retrieval::FULLTEXT_PENALTY,
            vector_penalty: retrieval::VECTOR_PENALTY,
        }
    }
}

impl From<&bedding_agent_config::RetrievalConfig> for RetrieverConfig {
    fn from(config: &bedding_agent_config::RetrievalConfig) -> Self {
        Self {
            top_k: config.search_top_k,
            candidate_pool_k: config.candidate_pool_k,
            fulltext_penalty: config.fulltext_penalty,
            vector_penalty: config.vector_penalty,
        }
    }
}

/// Structured post-filters for the product corpus.
///
/// Omitted parameters impose no constraint; all-`None` filters match every
/// document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub product_name: Option<String>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub size: Option<String>,
}

impl ProductFilters {
    pub fn is_empty(&self) -> bool {
        self.category.is_none()
            && self.product_name.is_none()
            && self.price_min.is_none()
            && self.price_max.is_none()
            && self.size.is_none()
    }

    /// Conjunctive predicate over one normalized document.
    ///
    /// Price bounds apply to the stored aggregate range, not per-variant
    /// prices; an item with no numeric prices (`None` bounds) fails any
    /// price constraint.
    pub fn matches(&self, doc: &CanonicalDocument) -> bool {
        if let Some(category) = &self.category {
            if &doc.category != category {
                return false;
            }
        }
        if let Some(product_name) = &self.product_name {
            if &doc.product_name != product_name {
                return false;
            }
        }
        if let Some(price_min) = self.price_min {
            match doc.price_range.min {
                Some(min) if min >= price_min => {},
                _ => return false,
            }
        }
        if let Some(price_max) = self.price_max {
            match doc.price_range.max {
                Some(max) if max <= price_max => {},
                _ => return false,
            }
        }
        if let Some(size) = &self.size {
            if !doc.variants.iter().any(|v| &v.size == size) {
                return false;
            }
        }
        true
    }
}

/// One formatted product match from semantic search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSearchResult {
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub variants: Vec<Variant>,
    pub price_range: PriceRange,
    /// Fused rank; lower is better
    pub rank: f32,
}

/// FAQ search result: the QA entry with its fused rank filled in
pub type QaSearchResult = QAEntry;

/// One fused candidate prior to formatting
#[derive(Debug, Clone)]
pub struct FusedCandidate {
    pub id: String,
    pub content: String,
    pub metadata: HashMap<String, String>,
    /// Penalized reciprocal-rank score; higher is better
    pub score: f32,
    /// Position in the fused ordering, assigned before post-filtering
    pub rank: usize,
}

/// The dense + full-text index pair backing one corpus
#[derive(Clone)]
pub struct CorpusIndexes {
    pub dense: Arc<dyn DenseIndex>,
    pub fulltext: Arc<SparseIndex>,
}

/// Hybrid retriever over the FAQ and product corpora
pub struct HybridRetriever {
    config: RetrieverConfig,
    embedder: Arc<dyn Embedder>,
    qa: CorpusIndexes,
    products: CorpusIndexes,
    catalog: Arc<CatalogStore>,
}

impl HybridRetriever {
    pub fn new(
        config: RetrieverConfig,
        embedder: Arc<dyn Embedder>,
        qa: CorpusIndexes,
        products: CorpusIndexes,
        catalog: Arc<CatalogStore>,
    ) -> Self {
        Self {
            config,
            embedder,
            qa,
            products,
            catalog,
        }
    }

    /// Semantic search over the FAQ knowledge base.
    ///
    /// FAQ documents carry no structured attributes, so no post-filters
    /// apply; results come back sorted by fused rank.
    pub async fn search_qa(&self, query: &str) -> Result<Vec<QaSearchResult>, RagError> {
        let candidates = self.search_corpus(&self.qa, query).await?;

        let results: Vec<QaSearchResult> = candidates
            .into_iter()
            .take(self.config.top_k)
            .map(|c| QAEntry {
                source: c.metadata.get("source").cloned().unwrap_or_default(),
                url: c.metadata.get("url").cloned().unwrap_or_default(),
                content: c.content,
                rank: c.rank as f32,
            })
            .collect();

        if results.is_empty() {
            tracing::debug!(query, "No FAQ match, returning placeholder");
            return Ok(vec![qa_placeholder()]);
        }
        Ok(results)
    }

    /// Semantic search over the product catalog with optional post-filters
    pub async fn search_products(
        &self,
        query: &str,
        filters: &ProductFilters,
    ) -> Result<Vec<ProductSearchResult>, RagError> {
        let candidates = self.search_corpus(&self.products, query).await?;

        let results: Vec<ProductSearchResult> = candidates
            .into_iter()
            .filter_map(|c| {
                let doc = self.catalog.get(&c.id);
                if doc.is_none() {
                    tracing::warn!(id = %c.id, "Fused candidate missing from catalog store");
                }
                doc.map(|doc| (c.rank, doc))
            })
            .filter(|(_, doc)| filters.matches(doc))
            .take(self.config.top_k)
            .map(|(rank, doc)| ProductSearchResult {
                product_name: doc.product_name,
                description: doc.content,
                category: doc.category,
                variants: doc.variants,
                price_range: doc.price_range,
                rank: rank as f32,
            })
            .collect();

        if results.is_empty() {
            tracing::debug!(query, "No product match, returning placeholder");
            return Ok(vec![product_placeholder()]);
        }
        Ok(results)
    }

    /// Run both underlying searches and fuse their rankings.
    ///
    /// Dense and full-text search run concurrently; Tantivy search is
    /// CPU-bound and moves off the async executor.
    async fn search_corpus(
        &self,
        corpus: &CorpusIndexes,
        query: &str,
    ) -> Result<Vec<FusedCandidate>, RagError> {
        let pool_k = self.config.candidate_pool_k;

        let dense_future = async {
            let embedding = self.embedder.embed(query).await?;
            corpus.dense.search(&embedding, pool_k).await
        };

        let fulltext_index = Arc::clone(&corpus.fulltext);
        let query_owned = query.to_string();
        let fulltext_future = async move {
            tokio::task::spawn_blocking(move || fulltext_index.search(&query_owned, pool_k))
                .await
                .map_err(|e| RagError::Search(format!("Full-text search task failed: {}", e)))?
        };

        let (dense_result, fulltext_result) = tokio::join!(dense_future, fulltext_future);
        let dense_hits = dense_result?;
        let fulltext_hits = fulltext_result?;

        Ok(self.fuse(&fulltext_hits, &dense_hits))
    }

    /// Penalized reciprocal-rank fusion.
    ///
    /// Each candidate scores `1 / (rank_in_list + penalty)` summed over the
    /// lists it appears in; membership in a single list still scores. Ties
    /// break on document id so identical inputs always produce identical
    /// orderings.
    pub fn fuse(&self, fulltext: &[SparseHit], dense: &[DenseHit]) -> Vec<FusedCandidate> {
        let mut fused: HashMap<String, FusedCandidate> = HashMap::new();

        for (rank, hit) in fulltext.iter().enumerate() {
            let score = 1.0 / (rank as f32 + 1.0 + self.config.fulltext_penalty);
            fused
                .entry(hit.id.clone())
                .and_modify(|c| c.score += score)
                .or_insert_with(|| FusedCandidate {
                    id: hit.id.clone(),
                    content: hit.content.clone(),
                    metadata: hit.metadata.clone(),
                    score,
                    rank: 0,
                });
        }

        for (rank, hit) in dense.iter().enumerate() {
            let score = 1.0 / (rank as f32 + 1.0 + self.config.vector_penalty);
            fused
                .entry(hit.id.clone())
                .and_modify(|c| c.score += score)
                .or_insert_with(|| FusedCandidate {
                    id: hit.id.clone(),
                    content: hit.content.clone(),
                    metadata: hit.metadata.clone(),
                    score,
                    rank: 0,
                });
        }

        let mut candidates: Vec<FusedCandidate> = fused.into_values().collect();
        candidates.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.id.cmp(&b.id))
        });

        for (position, candidate) in candidates.iter_mut().enumerate() {
            candidate.rank = position;
        }

        candidates
    }
}

/// Synthetic no-match FAQ record, preserving the result schema shape
pub fn qa_placeholder() -> QaSearchResult {
    QAEntry {
        source: QA_FALLBACK_SOURCE.to_string(),
        url: String::new(),
        content: QA_NO_MATCH_MESSAGE.to_string(),
        rank: 0.0,
    }
}

/// Synthetic no-match product record, preserving the result schema shape
pub fn product_placeholder() -> ProductSearchResult {
    ProductSearchResult {
        product_name: PRODUCT_NO_MATCH_MESSAGE.to_string(),
        description: String::new(),
        category: String::new(),
        variants: Vec::new(),
        price_range: PriceRange::default(),
        rank: 0.0,
    }
}

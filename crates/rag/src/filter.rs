//! Exact Filter Engine
//!
//! Deterministic attribute filtering over the normalized catalog store, for
//! queries like "quilts under $2000" where relevance ranking is the wrong
//! tool. Every constraint is an exact conjunctive predicate; no text
//! scoring, no fusion, no embedding round trip.

use serde::{Deserialize, Serialize};

use bedding_agent_config::constants::retrieval;
use bedding_agent_core::{PriceRange, Variant};

use crate::catalog_store::CatalogStore;
use crate::retriever::ProductFilters;
use crate::RagError;

const FILTER_NO_MATCH_MESSAGE: &str = "很抱歉，我無法在現有的資料中找到符合條件的產品。\
建議您直接聯繫我們的客服部門，他們將為您提供更詳細的協助。";

/// One product match from exact filtering.
///
/// Matches all score 1.0; there is no ranking signal in a deterministic
/// filter. The synthetic no-match record scores 0.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductFilterResult {
    pub product_name: String,
    pub description: String,
    pub category: String,
    pub variants: Vec<Variant>,
    pub price_range: PriceRange,
    pub score: f32,
}

/// Exact filter engine configuration
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Result cap for one filter query
    pub limit: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            limit: retrieval::FILTER_LIMIT,
        }
    }
}

/// Deterministic filter over the normalized catalog
pub struct ExactFilterEngine {
    config: FilterConfig,
    catalog: std::sync::Arc<CatalogStore>,
}

impl ExactFilterEngine {
    pub fn new(config: FilterConfig, catalog: std::sync::Arc<CatalogStore>) -> Self {
        Self { config, catalog }
    }

    /// Return every catalog document satisfying all given constraints, in
    /// catalog order, up to the configured cap.
    ///
    /// All-`None` filters scan the whole catalog unfiltered. An empty match
    /// set yields the synthetic no-match record so the result schema never
    /// changes shape.
    pub fn filter(&self, filters: &ProductFilters) -> Result<Vec<ProductFilterResult>, RagError> {
        let matched = self
            .catalog
            .select(self.config.limit, |doc| filters.matches(doc));

        tracing::debug!(
            matched = matched.len(),
            catalog = self.catalog.len(),
            "Exact filter scan"
        );

        if matched.is_empty() {
            return Ok(vec![filter_placeholder()]);
        }

        Ok(matched
            .into_iter()
            .map(|doc| ProductFilterResult {
                product_name: doc.product_name,
                description: doc.content,
                category: doc.category,
                variants: doc.variants,
                price_range: doc.price_range,
                score: 1.0,
            })
            .collect())
    }
}

/// Synthetic no-match record for an empty filter result
pub fn filter_placeholder() -> ProductFilterResult {
    ProductFilterResult {
        product_name: FILTER_NO_MATCH_MESSAGE.to_string(),
        description: String::new(),
        category: String::new(),
        variants: Vec::new(),
        price_range: PriceRange::default(),
        score: 0.0,
    }
}

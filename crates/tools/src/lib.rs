//! Agent-facing Tools
//!
//! Exposes the retrieval layer to the agent as schema-described tools:
//! FAQ knowledge-base search, semantic product search, and exact product
//! filtering. Tool inputs and outputs are plain JSON so any function-calling
//! LLM interface can drive them.

pub mod registry;
pub mod schema;
pub mod search_tools;

pub use registry::{create_retrieval_registry, ToolExecutor, ToolRegistry};
pub use schema::{
    InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema,
    DEFAULT_TOOL_TIMEOUT_SECS,
};
pub use search_tools::{
    FaqSearchTool, ProductFilterTool, ProductSearchTool, FAQ_SEARCH_TOOL, PRODUCT_FILTER_TOOL,
    PRODUCT_SEARCH_TOOL,
};

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Arc;

    use bedding_agent_core::{CanonicalDocument, PriceRange, Variant};
    use bedding_agent_rag::{
        CatalogStore, CorpusIndexes, DenseHit, DenseIndex, ExactFilterEngine, FilterConfig,
        HybridRetriever, RagError, RetrieverConfig, SimpleEmbedder, SparseConfig, SparseIndex,
    };

    struct StubDenseIndex {
        hits: Vec<DenseHit>,
    }

    #[async_trait]
    impl DenseIndex for StubDenseIndex {
        async fn search(&self, _: &[f32], top_k: usize) -> Result<Vec<DenseHit>, RagError> {
            Ok(self.hits.iter().take(top_k).cloned().collect())
        }
    }

    fn doc(id: &str, category: &str, price: i64) -> CanonicalDocument {
        let variants = vec![Variant::fixed("3*4", price)];
        CanonicalDocument {
            id: id.to_string(),
            content: format!("類別: {} | 產品名稱: {} | 描述", category, id),
            product_name: id.to_string(),
            category: category.to_string(),
            price_range: PriceRange::from_variants(&variants),
            variants,
            pricing_type: None,
            availability_status: None,
        }
    }

    fn registry_over(docs: Vec<CanonicalDocument>) -> ToolRegistry {
        let catalog = Arc::new(CatalogStore::new());
        catalog.replace_all(docs.clone());

        let product_fulltext = Arc::new(SparseIndex::new(SparseConfig::default()).unwrap());
        let index_docs: Vec<_> = docs
            .iter()
            .map(|d| bedding_agent_rag::IndexDocument {
                id: d.id.clone(),
                content: d.content.clone(),
                metadata: HashMap::new(),
            })
            .collect();
        product_fulltext.index_documents(&index_docs).unwrap();

        let dense_hits: Vec<DenseHit> = docs
            .iter()
            .enumerate()
            .map(|(i, d)| DenseHit {
                id: d.id.clone(),
                score: 1.0 - i as f32 * 0.1,
                content: d.content.clone(),
                metadata: HashMap::new(),
            })
            .collect();

        let retriever = Arc::new(HybridRetriever::new(
            RetrieverConfig::default(),
            Arc::new(SimpleEmbedder::new(32)),
            CorpusIndexes {
                dense: Arc::new(StubDenseIndex { hits: Vec::new() }),
                fulltext: Arc::new(SparseIndex::new(SparseConfig::default()).unwrap()),
            },
            CorpusIndexes {
                dense: Arc::new(StubDenseIndex { hits: dense_hits }),
                fulltext: product_fulltext,
            },
            catalog.clone(),
        ));
        let engine = Arc::new(ExactFilterEngine::new(FilterConfig::default(), catalog));

        create_retrieval_registry(retriever, engine)
    }

    #[test]
    fn registry_has_all_three_tools() {
        let registry = registry_over(Vec::new());
        assert_eq!(registry.len(), 3);
        assert!(registry.has(FAQ_SEARCH_TOOL));
        assert!(registry.has(PRODUCT_SEARCH_TOOL));
        assert!(registry.has(PRODUCT_FILTER_TOOL));
    }

    #[test]
    fn schemas_declare_required_fields() {
        let registry = registry_over(Vec::new());

        let search = registry.get_tool(PRODUCT_SEARCH_TOOL).unwrap();
        assert_eq!(search.input_schema.required, vec!["query"]);
        assert!(search.input_schema.properties.contains_key("price_max"));

        let filter = registry.get_tool(PRODUCT_FILTER_TOOL).unwrap();
        assert!(filter.input_schema.required.is_empty());
    }

    #[tokio::test]
    async fn missing_query_is_rejected_before_execution() {
        let registry = registry_over(Vec::new());

        let err = registry
            .execute(PRODUCT_SEARCH_TOOL, json!({"category": "棉被"}))
            .await
            .unwrap_err();
        assert!(matches!(err, ToolError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn unknown_tool_is_not_found() {
        let registry = registry_over(Vec::new());
        let err = registry.execute("no_such_tool", json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::NotFound(_)));
    }

    #[tokio::test]
    async fn product_filter_tool_end_to_end() {
        let registry = registry_over(vec![
            doc("康適被", "棉被", 750),
            doc("乳膠枕", "枕頭", 1900),
        ]);

        let output = registry
            .execute(PRODUCT_FILTER_TOOL, json!({"category": "棉被"}))
            .await
            .unwrap();

        let results = output.content.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["product_name"], "康適被");
        assert_eq!(results[0]["score"], 1.0);
    }

    #[tokio::test]
    async fn product_search_tool_end_to_end() {
        let registry = registry_over(vec![
            doc("康適被", "棉被", 750),
            doc("乳膠枕", "枕頭", 1900),
        ]);

        let output = registry
            .execute(
                PRODUCT_SEARCH_TOOL,
                json!({"query": "康適被", "price_max": 1000}),
            )
            .await
            .unwrap();

        let results = output.content.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["product_name"], "康適被");
        assert!(results[0]["rank"].is_number());
    }

    #[tokio::test]
    async fn faq_search_falls_back_to_placeholder() {
        let registry = registry_over(Vec::new());

        let output = registry
            .execute(FAQ_SEARCH_TOOL, json!({"query": "品牌故事"}))
            .await
            .unwrap();

        let results = output.content.as_array().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0]["source"], "系統預設");
    }
}

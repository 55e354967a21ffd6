//! Retrieval Tools
//!
//! The three agent-facing retrieval operations: FAQ knowledge-base search,
//! semantic product search with optional post-filters, and exact product
//! filtering. Descriptions spell out scope boundaries because the agent's
//! tool choice depends entirely on them.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use bedding_agent_rag::{ExactFilterEngine, HybridRetriever, ProductFilters};

use crate::schema::{InputSchema, PropertySchema, Tool, ToolError, ToolOutput, ToolSchema};

pub const FAQ_SEARCH_TOOL: &str = "faq_search_tool";
pub const PRODUCT_SEARCH_TOOL: &str = "product_search_tool";
pub const PRODUCT_FILTER_TOOL: &str = "product_filter_tool";

const FAQ_SEARCH_DESCRIPTION: &str = "DO NOT USE THIS TOOL FOR ANY PRODUCT-RELATED QUESTIONS. \
Use only for brand/company FAQs like brand story, store introduction, bedding knowledge \
(kindergarten bedding, dorm life, pillow/quilt selection, maintenance) and company ESG reports. \
NEVER use this tool for product features, suitability, sizes, or recommendations; \
use product_search_tool instead.";

const PRODUCT_SEARCH_DESCRIPTION: &str = "Use for semantic product queries: features, \
recommendations, or fuzzy matches. Finds relevant products by meaning using natural language \
search. Only include filter parameters when the user explicitly asks for them. \
DO NOT use for exact filtering (e.g. \"products under 2500\"); use product_filter_tool instead.";

const PRODUCT_FILTER_DESCRIPTION: &str = "Use for exact product filtering by category, name, \
price, or size. Returns every product matching all given criteria. \
DO NOT use for fuzzy or descriptive queries; use product_search_tool instead.";

fn filter_properties(schema: InputSchema) -> InputSchema {
    schema
        .property(
            "category",
            PropertySchema::string("Filter by exact product category"),
            false,
        )
        .property(
            "product_name",
            PropertySchema::string("Filter by exact product name"),
            false,
        )
        .property(
            "price_min",
            PropertySchema::integer("Minimum price filter"),
            false,
        )
        .property(
            "price_max",
            PropertySchema::integer("Maximum price filter"),
            false,
        )
        .property(
            "size",
            PropertySchema::string("Product size in 台尺 (e.g. \"6*7\")"),
            false,
        )
}

fn parse_filters(input: &Value) -> Result<ProductFilters, ToolError> {
    serde_json::from_value(input.clone())
        .map_err(|e| ToolError::InvalidInput(format!("Bad filter arguments: {}", e)))
}

fn query_arg(input: &Value) -> Result<&str, ToolError> {
    input
        .get("query")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ToolError::InvalidInput("Missing required field: query".to_string()))
}

/// FAQ knowledge-base search
pub struct FaqSearchTool {
    retriever: Arc<HybridRetriever>,
}

impl FaqSearchTool {
    pub fn new(retriever: Arc<HybridRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for FaqSearchTool {
    fn name(&self) -> &str {
        FAQ_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        FAQ_SEARCH_DESCRIPTION
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: FAQ_SEARCH_TOOL.to_string(),
            description: FAQ_SEARCH_DESCRIPTION.to_string(),
            input_schema: InputSchema::object().property(
                "query",
                PropertySchema::string(
                    "The user's question (include context only if it's a follow-up)",
                ),
                true,
            ),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let query = query_arg(&input)?;
        let results = self.retriever.search_qa(query).await?;

        tracing::debug!(query, results = results.len(), "FAQ search");
        let content = serde_json::to_value(results)
            .map_err(|e| ToolError::Execution(e.to_string()))?;
        Ok(ToolOutput::json(content))
    }
}

/// Semantic product search with optional post-filters
pub struct ProductSearchTool {
    retriever: Arc<HybridRetriever>,
}

impl ProductSearchTool {
    pub fn new(retriever: Arc<HybridRetriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl Tool for ProductSearchTool {
    fn name(&self) -> &str {
        PRODUCT_SEARCH_TOOL
    }

    fn description(&self) -> &str {
        PRODUCT_SEARCH_DESCRIPTION
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: PRODUCT_SEARCH_TOOL.to_string(),
            description: PRODUCT_SEARCH_DESCRIPTION.to_string(),
            input_schema: filter_properties(InputSchema::object().property(
                "query",
                PropertySchema::string("Free-text product search (REQUIRED)"),
                true,
            )),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let query = query_arg(&input)?.to_string();
        let filters = parse_filters(&input)?;
        let results = self.retriever.search_products(&query, &filters).await?;

        tracing::debug!(query, results = results.len(), "Product search");
        let content = serde_json::to_value(results)
            .map_err(|e| ToolError::Execution(e.to_string()))?;
        Ok(ToolOutput::json(content))
    }
}

/// Exact product filtering over the normalized catalog
pub struct ProductFilterTool {
    engine: Arc<ExactFilterEngine>,
}

impl ProductFilterTool {
    pub fn new(engine: Arc<ExactFilterEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for ProductFilterTool {
    fn name(&self) -> &str {
        PRODUCT_FILTER_TOOL
    }

    fn description(&self) -> &str {
        PRODUCT_FILTER_DESCRIPTION
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: PRODUCT_FILTER_TOOL.to_string(),
            description: PRODUCT_FILTER_DESCRIPTION.to_string(),
            input_schema: filter_properties(InputSchema::object()),
        }
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError> {
        let filters = parse_filters(&input)?;
        let results = self.engine.filter(&filters)?;

        tracing::debug!(results = results.len(), "Product filter");
        let content = serde_json::to_value(results)
            .map_err(|e| ToolError::Execution(e.to_string()))?;
        Ok(ToolOutput::json(content))
    }
}

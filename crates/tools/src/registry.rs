//! Tool Registry
//!
//! Manages tool registration, discovery, and execution. Execution is
//! timeout-wrapped so a stuck store connection cannot block the agent turn
//! indefinitely.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bedding_agent_rag::{ExactFilterEngine, HybridRetriever};

use crate::schema::{Tool, ToolError, ToolOutput, ToolSchema};
use crate::search_tools::{FaqSearchTool, ProductFilterTool, ProductSearchTool};

/// Tool executor trait
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Execute a tool by name
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError>;

    /// List available tools
    fn list_tools(&self) -> Vec<ToolSchema>;

    /// Get tool schema by name
    fn get_tool(&self, name: &str) -> Option<ToolSchema>;
}

/// Tool registry
#[derive(Default)]
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let name = tool.name().to_string();
        self.tools.insert(name, Arc::new(tool));
    }

    /// Register a boxed tool
    pub fn register_boxed(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.name().to_string();
        self.tools.insert(name, tool);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.get(name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    pub fn tool_names(&self) -> Vec<String> {
        self.tools.keys().cloned().collect()
    }
}

#[async_trait]
impl ToolExecutor for ToolRegistry {
    /// Execute a tool with timeout protection
    async fn execute(&self, name: &str, arguments: Value) -> Result<ToolOutput, ToolError> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| ToolError::NotFound(name.to_string()))?;

        tool.validate(&arguments)?;

        let timeout_secs = tool.timeout_secs();
        tracing::trace!(tool = name, timeout_secs, "Executing tool");

        match tokio::time::timeout(Duration::from_secs(timeout_secs), tool.execute(arguments))
            .await
        {
            Ok(result) => result,
            Err(_elapsed) => Err(ToolError::Timeout {
                name: name.to_string(),
                seconds: timeout_secs,
            }),
        }
    }

    fn list_tools(&self) -> Vec<ToolSchema> {
        self.tools.values().map(|t| t.schema()).collect()
    }

    fn get_tool(&self, name: &str) -> Option<ToolSchema> {
        self.tools.get(name).map(|t| t.schema())
    }
}

/// Create the retrieval tool registry over a wired retriever and filter engine
pub fn create_retrieval_registry(
    retriever: Arc<HybridRetriever>,
    filter_engine: Arc<ExactFilterEngine>,
) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(FaqSearchTool::new(retriever.clone()));
    registry.register(ProductSearchTool::new(retriever));
    registry.register(ProductFilterTool::new(filter_engine));

    tracing::info!(tools = registry.len(), "Created retrieval tool registry");

    registry
}

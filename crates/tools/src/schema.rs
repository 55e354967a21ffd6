//! Tool Interface Types
//!
//! The tool contract exposed to the agent layer: a name, a JSON Schema
//! describing the input object, and a JSON result. Input validation checks
//! required fields before execution so tools can assume they exist.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// Default timeout for tool execution (seconds)
pub const DEFAULT_TOOL_TIMEOUT_SECS: u64 = 30;

/// Tool execution errors
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Tool not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Execution failed: {0}")]
    Execution(String),

    #[error("Tool {name} timed out after {seconds}s")]
    Timeout { name: String, seconds: u64 },
}

impl From<bedding_agent_rag::RagError> for ToolError {
    fn from(err: bedding_agent_rag::RagError) -> Self {
        ToolError::Execution(err.to_string())
    }
}

impl From<ToolError> for bedding_agent_core::Error {
    fn from(err: ToolError) -> Self {
        bedding_agent_core::Error::Tool(err.to_string())
    }
}

/// One property in a tool's input schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    pub description: String,
    #[serde(rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
}

impl PropertySchema {
    pub fn string(description: impl Into<String>) -> Self {
        Self {
            property_type: "string".to_string(),
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn integer(description: impl Into<String>) -> Self {
        Self {
            property_type: "integer".to_string(),
            description: description.into(),
            enum_values: None,
        }
    }

    pub fn enum_type(description: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            property_type: "string".to_string(),
            description: description.into(),
            enum_values: Some(values),
        }
    }
}

/// JSON Schema for a tool's input object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: BTreeMap<String, PropertySchema>,
    pub required: Vec<String>,
}

impl InputSchema {
    pub fn object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: BTreeMap::new(),
            required: Vec::new(),
        }
    }

    pub fn property(mut self, name: &str, schema: PropertySchema, required: bool) -> Self {
        self.properties.insert(name.to_string(), schema);
        if required {
            self.required.push(name.to_string());
        }
        self
    }
}

/// Complete tool schema advertised to the agent layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: InputSchema,
}

/// Tool execution result
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolOutput {
    pub content: Value,
}

impl ToolOutput {
    pub fn json(content: Value) -> Self {
        Self { content }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: Value::String(text.into()),
        }
    }
}

/// A callable tool
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn schema(&self) -> ToolSchema;

    /// Check required fields before execution
    fn validate(&self, input: &Value) -> Result<(), ToolError> {
        let schema = self.schema();
        for field in &schema.input_schema.required {
            let present = input
                .get(field)
                .map(|v| !v.is_null())
                .unwrap_or(false);
            if !present {
                return Err(ToolError::InvalidInput(format!(
                    "Missing required field: {}",
                    field
                )));
            }
        }
        Ok(())
    }

    /// Per-tool execution timeout
    fn timeout_secs(&self) -> u64 {
        DEFAULT_TOOL_TIMEOUT_SECS
    }

    async fn execute(&self, input: Value) -> Result<ToolOutput, ToolError>;
}

//! Configuration for the bedding retailer chatbot
//!
//! Layered settings loading (file + `BEDDING_AGENT_*` environment overrides)
//! and centralized constants.

pub mod constants;
pub mod settings;

pub use settings::{
    ChunkingConfig, EmbeddingSettings, RetrievalConfig, Settings, StoreConfig,
};

use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

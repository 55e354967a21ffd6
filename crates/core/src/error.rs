//! Workspace-wide error type
//!
//! Each crate defines its own typed error and converts into this one at the
//! boundary, so callers above the tools layer deal with a single enum.

use thiserror::Error;

/// Top-level error for the bedding agent core
#[derive(Error, Debug)]
pub enum Error {
    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Retrieval error: {0}")]
    Retrieval(String),

    #[error("Tool error: {0}")]
    Tool(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Convenience result alias
pub type Result<T> = std::result::Result<T, Error>;

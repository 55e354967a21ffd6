//! Catalog normalization pipeline
//!
//! Turns raw catalog rows with inconsistent, overlapping price/size encodings
//! into the canonical schema the retrieval engine indexes:
//! - Price/size parsing into typed tokens (fixed prices, weight pricing,
//!   status sentinels)
//! - Variant building with fixed / by-weight / mixed pricing modes
//! - Canonical document assembly with enriched embeddable content
//!
//! Everything here is pure transformation; indexing happens in the rag crate.

pub mod assembler;
pub mod loader;
pub mod price_parser;
pub mod variants;

pub use assembler::{assemble, assemble_all, AVAILABILITY_COMING_SOON};
pub use loader::{CatalogFile, CatalogLoader};
pub use price_parser::{
    classify_segment, parse_sizes, tokenize_entries, tokenize_price_str, PriceStatus,
    RawPriceToken,
};
pub use variants::{build_variants, build_weight_variants, last_price_fallback, BuiltVariants};

use thiserror::Error;

/// Catalog loading errors. Parsing itself never errors; irregular price
/// text degrades to sentinels per segment.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("I/O error: {0}")]
    Io(String),

    #[error("Format error: {0}")]
    Format(String),
}

impl From<CatalogError> for bedding_agent_core::Error {
    fn from(err: CatalogError) -> Self {
        bedding_agent_core::Error::Catalog(err.to_string())
    }
}

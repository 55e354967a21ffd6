//! Core domain types for the bedding retailer chatbot
//!
//! This crate provides foundational types used across all other crates:
//! - Canonical catalog types (variants, price ranges, documents)
//! - Raw catalog input types
//! - FAQ knowledge-base entry type
//! - Error types

pub mod error;
pub mod product;
pub mod qa;
pub mod raw;

pub use error::{Error, Result};
pub use product::{CanonicalDocument, PriceRange, PricingType, Variant, VariantPrice};
pub use qa::QAEntry;
pub use raw::{RawCatalogItem, RawPriceEntry};

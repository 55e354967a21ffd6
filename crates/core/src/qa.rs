//! FAQ knowledge-base entry type

use serde::{Deserialize, Serialize};

/// One chunk of crawled FAQ text. Carries no structured product attributes;
/// `rank` is the fused position assigned at query time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QAEntry {
    /// Logical source the chunk was crawled from (e.g. 品牌故事)
    pub source: String,
    /// URL of the source page
    pub url: String,
    /// Chunk text
    pub content: String,
    /// Fused rank; lower is better
    pub rank: f32,
}

//! Price/Size Parser
//!
//! Converts the catalog's heterogeneous raw price encodings into typed
//! tokens. Upstream revisions supply either a delimited string
//! (`"$750 / $850 / $1600"`) or a pre-split list of mixed-type entries;
//! both shapes normalize into the same `RawPriceToken` stream here, once,
//! at the boundary.
//!
//! Catalog data is known to be irregular, so a malformed segment degrades
//! (skipped or mapped to a sentinel) instead of failing the rebuild.

use once_cell::sync::Lazy;
use regex::Regex;

use bedding_agent_core::RawPriceEntry;

/// First run of digits, commas already stripped
static PRICE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Weight tag like `(1.5斤)`
static WEIGHT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([\d.]+斤)\)").unwrap());

/// Size tag like `(5*7)`
static SIZE_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(([\d*]+)\)").unwrap());

/// Weight-pricing sentinel: the variant has no fixed price
const BY_WEIGHT_SENTINEL: &str = "依斤計價";

/// Status sentinel carried when a price is not purchasable yet.
///
/// The phrases are matched as exact substrings of the raw segment,
/// including the misspelled variants observed in the catalog source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceStatus {
    /// 未列出 / 尚未列出 / 價格未列出
    NotListed,
    /// 尚未上架 / 尚位上架
    NotYetAvailable,
}

impl PriceStatus {
    /// Classify a raw segment, if it carries a status phrase
    pub fn from_raw(segment: &str) -> Option<Self> {
        if segment.contains("未列出") {
            // Covers 未列出, 尚未列出 and 價格未列出
            return Some(Self::NotListed);
        }
        if segment.contains("尚未上架") || segment.contains("尚位上架") {
            return Some(Self::NotYetAvailable);
        }
        None
    }

    /// Human-readable message stored in place of a numeric price
    pub fn message(&self) -> &'static str {
        match self {
            Self::NotListed => "Price hasn't yet been listed",
            Self::NotYetAvailable => "Product isn't available yet",
        }
    }
}

/// One typed price token, regardless of the raw shape it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawPriceToken {
    /// Plain positional price
    Numeric(i64),
    /// Price bound to an explicit size tag, e.g. `$3980 (5*7)`
    SizeBound { size: String, price: i64 },
    /// Price for a given weight, e.g. `$2550 (1.5斤)`
    WeightEncoded { price: i64, weight: String },
    /// Bare 依斤計價 sentinel
    ByWeight,
    /// Unavailable-price or not-yet-released sentinel
    Status(PriceStatus),
}

/// Extract the first integer run from a segment, tolerating `$` and `,`
fn extract_price(segment: &str) -> Option<i64> {
    let cleaned = segment.replace(',', "");
    PRICE_RE
        .find(&cleaned)
        .and_then(|m| m.as_str().parse::<i64>().ok())
}

/// Classify one raw segment into a token.
///
/// Returns `None` for segments with no recognizable price signal; the
/// caller decides how the gap degrades.
pub fn classify_segment(segment: &str) -> Option<RawPriceToken> {
    let segment = segment.trim();
    if segment.is_empty() {
        return None;
    }

    if let Some(status) = PriceStatus::from_raw(segment) {
        return Some(RawPriceToken::Status(status));
    }

    if segment.contains(BY_WEIGHT_SENTINEL) {
        return Some(RawPriceToken::ByWeight);
    }

    let price = extract_price(segment);

    if let Some(weight) = WEIGHT_RE.captures(segment).and_then(|c| c.get(1)) {
        if let Some(price) = price {
            return Some(RawPriceToken::WeightEncoded {
                price,
                weight: weight.as_str().to_string(),
            });
        }
    }

    if let Some(size) = SIZE_TAG_RE.captures(segment).and_then(|c| c.get(1)) {
        if let Some(price) = price {
            return Some(RawPriceToken::SizeBound {
                size: size.as_str().to_string(),
                price,
            });
        }
    }

    match price {
        Some(p) => Some(RawPriceToken::Numeric(p)),
        None => {
            tracing::debug!(segment, "Unrecognized price segment, skipping");
            None
        },
    }
}

/// Tokenize a slash-delimited raw price string
pub fn tokenize_price_str(price_str: &str) -> Vec<RawPriceToken> {
    price_str.split('/').filter_map(classify_segment).collect()
}

/// Tokenize a pre-split list of mixed-type price entries
pub fn tokenize_entries(entries: &[RawPriceEntry]) -> Vec<RawPriceToken> {
    entries
        .iter()
        .filter_map(|entry| match entry {
            RawPriceEntry::Int(p) => Some(RawPriceToken::Numeric(*p)),
            RawPriceEntry::Text(s) => classify_segment(s),
        })
        .collect()
}

/// Split a raw size string like `"3*4 / 4*5 / 5*7"` into size labels
pub fn parse_sizes(size_str: &str) -> Vec<String> {
    size_str
        .split('/')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

//! Variant Builder
//!
//! Pairs parsed sizes with parsed price tokens into the canonical `Variant`
//! list for one item, resolving the item-level pricing mode: fixed (no
//! item-level marker), by-weight, or mixed. Always emits exactly one variant
//! per input size (or per weight-price entry), never fewer.

use std::collections::HashMap;

use bedding_agent_core::{PricingType, Variant};

use crate::price_parser::{classify_segment, PriceStatus, RawPriceToken};

/// Variant list plus the item-level signals derived while building it
#[derive(Debug, Clone)]
pub struct BuiltVariants {
    pub variants: Vec<Variant>,
    /// `ByWeight` or `Mixed`; `None` for plain fixed pricing
    pub pricing_type: Option<PricingType>,
    /// Whether the raw price field carried a status sentinel
    pub had_status: bool,
}

/// Length-mismatch policy: a size beyond the price list reuses the last
/// parsed price. Deterministic fallback, never an error.
pub fn last_price_fallback(prices: &[i64], index: usize) -> Option<i64> {
    prices.get(index).or_else(|| prices.last()).copied()
}

/// Build variants from parsed sizes and the normalized token stream.
///
/// Resolution per size, in order: an explicit size-bound price wins; then the
/// bare weight sentinel (if present) marks the size as by-weight; then a
/// positional price (with last-price fallback); then the status message.
/// A size with no price signal at all degrades to the not-listed message so
/// the one-variant-per-size contract holds.
pub fn build_variants(sizes: &[String], tokens: &[RawPriceToken]) -> BuiltVariants {
    let mut size_bound: HashMap<&str, i64> = HashMap::new();
    let mut positional: Vec<i64> = Vec::new();
    let mut status: Option<PriceStatus> = None;
    let mut has_weight_pricing = false;

    for token in tokens {
        match token {
            RawPriceToken::SizeBound { size, price } => {
                size_bound.insert(size.as_str(), *price);
            },
            RawPriceToken::Numeric(price)
            | RawPriceToken::WeightEncoded { price, .. } => {
                positional.push(*price);
            },
            RawPriceToken::ByWeight => has_weight_pricing = true,
            RawPriceToken::Status(s) => {
                status.get_or_insert(*s);
            },
        }
    }

    let mut variants = Vec::with_capacity(sizes.len());

    for (i, size) in sizes.iter().enumerate() {
        if let Some(price) = size_bound.get(size.as_str()) {
            variants.push(Variant::fixed(size, *price));
        } else if has_weight_pricing {
            variants.push(Variant::by_weight(size));
        } else if let Some(price) = last_price_fallback(&positional, i) {
            variants.push(Variant::fixed(size, price));
        } else {
            let message = status.unwrap_or(PriceStatus::NotListed).message();
            variants.push(Variant::unavailable(size, message));
        }
    }

    BuiltVariants {
        pricing_type: item_pricing_type(&variants),
        had_status: status.is_some(),
        variants,
    }
}

/// Build variants from a dedicated weight-price list (no per-size variants).
///
/// The item as a whole is weight-priced even though each entry carries the
/// fixed price for its weight.
pub fn build_weight_variants(entries: &[String]) -> BuiltVariants {
    let variants: Vec<Variant> = entries
        .iter()
        .filter_map(|entry| match classify_segment(entry) {
            Some(RawPriceToken::WeightEncoded { price, weight }) => {
                Some(Variant::weight_encoded(weight, price))
            },
            other => {
                tracing::debug!(entry, ?other, "Skipping non weight-price entry");
                None
            },
        })
        .collect();

    BuiltVariants {
        variants,
        pricing_type: Some(PricingType::ByWeight),
        had_status: false,
    }
}

/// Item-level mode from the resolved variants: mixed when fixed and by-weight
/// coexist, by-weight when no variant has a fixed price but at least one is
/// weight-priced, otherwise plain fixed (unset).
fn item_pricing_type(variants: &[Variant]) -> Option<PricingType> {
    let numeric = variants.iter().filter(|v| v.price.is_numeric()).count();
    let by_weight = variants
        .iter()
        .filter(|v| v.pricing_type == Some(PricingType::ByWeight))
        .count();

    match (numeric, by_weight) {
        (1.., 1..) => Some(PricingType::Mixed),
        (0, 1..) => Some(PricingType::ByWeight),
        _ => None,
    }
}

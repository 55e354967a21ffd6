//! Canonical catalog types
//!
//! The normalized schema every raw catalog row is reduced to before indexing.
//! Raw rows encode pricing in several overlapping ways (fixed price lists,
//! weight-based pricing, mixed, status sentinels); after normalization exactly
//! one pricing signal is populated per variant.

use serde::{Deserialize, Serialize};

/// Price of a single variant.
///
/// Serializes to the wire shape the downstream agent layer expects:
/// a JSON number for a fixed price, a human-readable string when the price
/// is unavailable, and `null` for weight-based pricing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariantPrice {
    /// Fixed catalog price
    Fixed(i64),
    /// Human-readable unavailability message (e.g. price not yet listed)
    Unavailable(String),
    /// No fixed price; the variant is priced by weight at fulfillment
    None,
}

impl VariantPrice {
    /// Numeric price, if this variant has one
    pub fn as_fixed(&self) -> Option<i64> {
        match self {
            Self::Fixed(p) => Some(*p),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }
}

/// Item-level pricing mode.
///
/// Absent entirely for plain fixed-price items; the absence (not `null`)
/// is what signals "plain fixed pricing" to index filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    ByWeight,
    Mixed,
}

impl PricingType {
    /// Wire label, matching the serde representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ByWeight => "by_weight",
            Self::Mixed => "mixed",
        }
    }
}

/// One priced/sized configuration of a catalog item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Size label (e.g. "5*7"), or "custom" for weight-priced items
    pub size: String,
    /// Pricing signal for this variant
    pub price: VariantPrice,
    /// Weight label (e.g. "1.5斤") for weight-encoded entries
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Set to `ByWeight` only when this variant has no fixed price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<PricingType>,
}

impl Variant {
    /// Variant with a fixed catalog price
    pub fn fixed(size: impl Into<String>, price: i64) -> Self {
        Self {
            size: size.into(),
            price: VariantPrice::Fixed(price),
            weight: None,
            pricing_type: None,
        }
    }

    /// Variant priced by weight at fulfillment time
    pub fn by_weight(size: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            price: VariantPrice::None,
            weight: None,
            pricing_type: Some(PricingType::ByWeight),
        }
    }

    /// Variant whose price is not available; carries the status message
    pub fn unavailable(size: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            price: VariantPrice::Unavailable(status.into()),
            weight: None,
            pricing_type: None,
        }
    }

    /// Weight-encoded variant: fixed price for a given weight
    pub fn weight_encoded(weight: impl Into<String>, price: i64) -> Self {
        Self {
            size: "custom".to_string(),
            price: VariantPrice::Fixed(price),
            weight: Some(weight.into()),
            pricing_type: None,
        }
    }
}

/// Aggregate price range of an item, derived exclusively from variants with a
/// numeric price. Both fields `None` when no variant has one — distinct from
/// a 0–0 range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl PriceRange {
    /// Compute the range over the numeric-priced variants only
    pub fn from_variants(variants: &[Variant]) -> Self {
        let prices: Vec<i64> = variants.iter().filter_map(|v| v.price.as_fixed()).collect();
        Self {
            min: prices.iter().min().copied(),
            max: prices.iter().max().copied(),
        }
    }
}

/// Normalized, embeddable representation of one catalog item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalDocument {
    /// Stable document identity, used for idempotent re-indexing
    pub id: String,
    /// Embeddable text: category, product name and description concatenated
    pub content: String,
    pub product_name: String,
    pub category: String,
    pub variants: Vec<Variant>,
    pub price_range: PriceRange,
    /// Item-level pricing mode; omitted for plain fixed pricing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pricing_type: Option<PricingType>,
    /// Set when the item is not yet purchasable (no variants or sentinel price)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_price_wire_shape() {
        let fixed = serde_json::to_value(VariantPrice::Fixed(750)).unwrap();
        assert_eq!(fixed, serde_json::json!(750));

        let status =
            serde_json::to_value(VariantPrice::Unavailable("Price hasn't yet been listed".into()))
                .unwrap();
        assert_eq!(status, serde_json::json!("Price hasn't yet been listed"));

        let none = serde_json::to_value(VariantPrice::None).unwrap();
        assert_eq!(none, serde_json::Value::Null);
    }

    #[test]
    fn fixed_variant_omits_pricing_type() {
        let v = serde_json::to_value(Variant::fixed("3*4", 750)).unwrap();
        assert!(v.get("pricing_type").is_none());
        assert!(v.get("weight").is_none());
    }

    #[test]
    fn by_weight_variant_serializes_null_price() {
        let v = serde_json::to_value(Variant::by_weight("6*8")).unwrap();
        assert_eq!(v["price"], serde_json::Value::Null);
        assert_eq!(v["pricing_type"], "by_weight");
    }

    #[test]
    fn price_range_ignores_non_numeric() {
        let variants = vec![
            Variant::fixed("3*4", 750),
            Variant::by_weight("6*8"),
            Variant::fixed("4*5", 850),
        ];
        let range = PriceRange::from_variants(&variants);
        assert_eq!(range.min, Some(750));
        assert_eq!(range.max, Some(850));
    }

    #[test]
    fn price_range_all_by_weight_is_null_null() {
        let variants = vec![Variant::by_weight("5*7"), Variant::by_weight("6*8")];
        let range = PriceRange::from_variants(&variants);
        assert_eq!(range, PriceRange { min: None, max: None });
    }
}

//! Raw catalog input types
//!
//! One row per product as exported by the catalog source. Pricing arrives in
//! one of several shapes: a positional `prices` list (numbers mixed with
//! status strings and the weight-pricing sentinel), or a dedicated
//! `weight_prices` list of `"price (weight)"` strings. `sizes` and `prices`
//! should align positionally but length mismatch is tolerated downstream.

use serde::{Deserialize, Serialize};

/// One entry of a raw price list: either an integer or an uninterpreted
/// string (status sentinel, weight sentinel, or a price with decorations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawPriceEntry {
    Int(i64),
    Text(String),
}

/// Raw catalog row, prior to normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCatalogItem {
    pub category: String,
    pub product_name: String,
    pub description: String,
    /// Stable identity from the catalog source, when it supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Size labels, positionally aligned with `prices` when both are present
    #[serde(default)]
    pub sizes: Vec<String>,
    /// Mixed-type price entries
    #[serde(default)]
    pub prices: Vec<RawPriceEntry>,
    /// Weight-based price list (`"$2550 (1.5斤)"`), used instead of sizes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_prices: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mixed_price_list_deserializes() {
        let json = r#"{
            "category": "棉被",
            "product_name": "康適四孔棉抗菌被",
            "description": "透氣抗菌",
            "sizes": ["3*4", "4*5"],
            "prices": [750, "尚未上架", "依斤計價"]
        }"#;
        let item: RawCatalogItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.prices.len(), 3);
        assert_eq!(item.prices[0], RawPriceEntry::Int(750));
        assert_eq!(item.prices[2], RawPriceEntry::Text("依斤計價".to_string()));
        assert!(item.weight_prices.is_none());
    }

    #[test]
    fn yaml_row_with_weight_prices() {
        let yaml = "
category: 蠶絲被
product_name: 手工蠶絲被
description: 手工拉製
weight_prices:
  - \"$2550 (1.5斤)\"
  - \"$4250 (2.5斤)\"
";
        let item: RawCatalogItem = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(item.weight_prices.as_ref().unwrap().len(), 2);
        assert!(item.sizes.is_empty());
    }
}

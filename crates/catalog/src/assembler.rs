//! Catalog Document Assembler
//!
//! Produces one `CanonicalDocument` per raw catalog row. Pure transformation:
//! no store or network access happens here.

use bedding_agent_core::{CanonicalDocument, PriceRange, RawCatalogItem};

use crate::price_parser::tokenize_entries;
use crate::variants::{build_variants, build_weight_variants};

/// Marker stored on items that are not yet purchasable
pub const AVAILABILITY_COMING_SOON: &str = "coming_soon";

/// Assemble the canonical document for one raw catalog row.
///
/// The embedded `content` concatenates category, product name and the free
/// text description; bare descriptions under-match category and name based
/// queries.
pub fn assemble(item: &RawCatalogItem) -> CanonicalDocument {
    let built = match &item.weight_prices {
        Some(entries) if !entries.is_empty() => build_weight_variants(entries),
        _ => build_variants(&item.sizes, &tokenize_entries(&item.prices)),
    };

    let price_range = PriceRange::from_variants(&built.variants);

    let availability_status = if built.variants.is_empty() || built.had_status {
        Some(AVAILABILITY_COMING_SOON.to_string())
    } else {
        None
    };

    let content = format!(
        "類別: {} | 產品名稱: {} | {}",
        item.category, item.product_name, item.description
    );

    CanonicalDocument {
        id: document_id(item),
        content,
        product_name: item.product_name.clone(),
        category: item.category.clone(),
        variants: built.variants,
        price_range,
        pricing_type: built.pricing_type,
        availability_status,
    }
}

/// Assemble a whole catalog export
pub fn assemble_all(items: &[RawCatalogItem]) -> Vec<CanonicalDocument> {
    let docs: Vec<CanonicalDocument> = items.iter().map(assemble).collect();
    tracing::info!(items = items.len(), "Assembled canonical catalog documents");
    docs
}

/// Stable identity: the source-supplied `product_id` when present, otherwise
/// a deterministic slug of the product name so re-indexing stays idempotent.
fn document_id(item: &RawCatalogItem) -> String {
    if let Some(id) = &item.product_id {
        return id.clone();
    }
    item.product_name
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_alphanumeric() || *c == '-' || *c == '*')
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedding_agent_core::{PricingType, RawPriceEntry, Variant, VariantPrice};

    fn raw_item(sizes: &[&str], prices: Vec<RawPriceEntry>) -> RawCatalogItem {
        RawCatalogItem {
            category: "棉被".to_string(),
            product_name: "康適四孔棉抗菌被".to_string(),
            description: "透氣抗菌，適合台灣潮濕氣候".to_string(),
            product_id: None,
            sizes: sizes.iter().map(|s| s.to_string()).collect(),
            prices,
            weight_prices: None,
        }
    }

    #[test]
    fn fixed_price_item_with_fallback() {
        let item = raw_item(
            &["3*4", "4*5", "5*7"],
            vec![RawPriceEntry::Int(750), RawPriceEntry::Int(850)],
        );
        let doc = assemble(&item);

        assert_eq!(doc.variants.len(), 3);
        assert_eq!(doc.variants[2], Variant::fixed("5*7", 850));
        assert_eq!(doc.price_range.min, Some(750));
        assert_eq!(doc.price_range.max, Some(850));
        assert_eq!(doc.pricing_type, None);
        assert_eq!(doc.availability_status, None);

        // Plain fixed pricing serializes with no pricing_type field at all
        let json = serde_json::to_value(&doc).unwrap();
        assert!(json.get("pricing_type").is_none());
    }

    #[test]
    fn mixed_pricing_item() {
        let item = raw_item(
            &["5*7", "6*8"],
            vec![RawPriceEntry::Text("$3980 (5*7)/依斤計價".to_string())],
        );
        let doc = assemble(&item);

        assert_eq!(doc.variants[0], Variant::fixed("5*7", 3980));
        assert_eq!(doc.variants[1], Variant::by_weight("6*8"));
        assert_eq!(doc.pricing_type, Some(PricingType::Mixed));
        assert_eq!(doc.price_range.min, Some(3980));
        assert_eq!(doc.price_range.max, Some(3980));
    }

    #[test]
    fn weight_priced_item_uses_dedicated_list() {
        let mut item = raw_item(&[], vec![]);
        item.weight_prices = Some(vec![
            "$2550 (1.5斤)".to_string(),
            "$4250 (2.5斤)".to_string(),
        ]);
        let doc = assemble(&item);

        assert_eq!(doc.pricing_type, Some(PricingType::ByWeight));
        assert_eq!(doc.variants.len(), 2);
        assert!(doc.variants.iter().all(|v| v.size == "custom"));
        assert_eq!(doc.price_range.min, Some(2550));
        assert_eq!(doc.price_range.max, Some(4250));
    }

    #[test]
    fn all_by_weight_item_has_null_price_range() {
        let item = raw_item(
            &["5*7", "6*8"],
            vec![RawPriceEntry::Text("依斤計價".to_string())],
        );
        let doc = assemble(&item);
        assert_eq!(doc.price_range, PriceRange { min: None, max: None });
    }

    #[test]
    fn status_item_is_flagged_coming_soon() {
        let item = raw_item(
            &["3*4"],
            vec![RawPriceEntry::Text("尚未上架".to_string())],
        );
        let doc = assemble(&item);
        assert_eq!(
            doc.variants[0].price,
            VariantPrice::Unavailable("Product isn't available yet".to_string())
        );
        assert_eq!(doc.availability_status.as_deref(), Some(AVAILABILITY_COMING_SOON));
        assert_eq!(doc.price_range, PriceRange { min: None, max: None });
    }

    #[test]
    fn no_variants_is_flagged_coming_soon() {
        let item = raw_item(&[], vec![]);
        let doc = assemble(&item);
        assert!(doc.variants.is_empty());
        assert_eq!(doc.availability_status.as_deref(), Some(AVAILABILITY_COMING_SOON));
    }

    #[test]
    fn enriched_content_carries_category_and_name() {
        let item = raw_item(&["3*4"], vec![RawPriceEntry::Int(750)]);
        let doc = assemble(&item);
        assert!(doc.content.contains("類別: 棉被"));
        assert!(doc.content.contains("產品名稱: 康適四孔棉抗菌被"));
        assert!(doc.content.contains("透氣抗菌"));
    }

    #[test]
    fn document_id_prefers_product_id() {
        let mut item = raw_item(&["3*4"], vec![RawPriceEntry::Int(750)]);
        item.product_id = Some("P-0042".to_string());
        assert_eq!(assemble(&item).id, "P-0042");

        item.product_id = None;
        let a = assemble(&item).id;
        let b = assemble(&item).id;
        assert_eq!(a, b);
        assert!(!a.is_empty());
    }
}

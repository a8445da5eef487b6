// ABOUTME: Vendor merchandise extraction from the vendor sales document

use tracing::debug;

use crate::types::{Mod, VendorSalesDocument};

/// Identity-only mods for every sale slot of `vendor_id`.
///
/// A vendor missing from the document has nothing for sale; slots without an item hash
/// are skipped.
pub fn extract(sales: &VendorSalesDocument, vendor_id: &str) -> Vec<Mod> {
    let Some(vendor) = sales.get(vendor_id) else {
        debug!("Vendor {} has no sales in this document", vendor_id);
        return Vec::new();
    };

    vendor
        .sale_items
        .values()
        .filter_map(|item| item.item_hash.clone())
        .map(Mod::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use modwatch_config::destiny::ADA_VENDOR_ID;
    use serde_json::json;

    fn sales(value: serde_json::Value) -> VendorSalesDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_extracts_target_vendor_only() {
        let doc = sales(json!({
            "350061650": { "saleItems": {
                "0": { "itemHash": 132 },
                "1": { "itemHash": 4048086883u64 }
            }},
            "672118013": { "saleItems": { "0": { "itemHash": 555 } } }
        }));

        let mut hashes: Vec<String> = extract(&doc, ADA_VENDOR_ID)
            .into_iter()
            .map(|m| m.item_hash.to_string())
            .collect();
        hashes.sort();

        assert_eq!(hashes, vec!["132", "4048086883"]);
    }

    #[test]
    fn test_mods_are_identity_only() {
        let doc = sales(json!({ "350061650": { "saleItems": { "0": { "itemHash": 132 } } } }));

        let mods = extract(&doc, ADA_VENDOR_ID);

        assert_eq!(mods.len(), 1);
        assert!(mods[0].display_name.is_none());
        assert!(mods[0].item_type.is_none());
    }

    #[test]
    fn test_missing_vendor_is_empty() {
        let doc = sales(json!({ "672118013": { "saleItems": { "0": { "itemHash": 555 } } } }));
        assert!(extract(&doc, ADA_VENDOR_ID).is_empty());
        assert!(extract(&VendorSalesDocument::new(), ADA_VENDOR_ID).is_empty());
    }

    #[test]
    fn test_vendor_without_sale_items_is_empty() {
        let doc = sales(json!({ "350061650": {} }));
        assert!(extract(&doc, ADA_VENDOR_ID).is_empty());
    }

    #[test]
    fn test_slots_without_hash_skipped() {
        let doc = sales(json!({ "350061650": { "saleItems": {
            "0": { "quantity": 1 },
            "1": { "itemHash": 132 }
        }}}));

        let mods = extract(&doc, ADA_VENDOR_ID);

        assert_eq!(mods, vec![Mod::new("132")]);
    }
}

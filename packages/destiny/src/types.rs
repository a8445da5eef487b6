// ABOUTME: Core type definitions for Destiny items and upstream payloads
// ABOUTME: Item hashes, mods, and the typed shapes of vendor and collectible documents

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Stable catalog identifier of an item.
///
/// Bungie sends hashes as JSON numbers in definitions and sales, and as object keys
/// (strings) in collectibles. Both decode to the same decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ItemHash(String);

impl ItemHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hash from a loose JSON value. Integers and strings qualify; anything else is `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_u64()
                .map(Self::from)
                .or_else(|| n.as_i64().map(|v| Self(v.to_string()))),
            Value::String(s) => Some(Self(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for ItemHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for ItemHash {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ItemHash {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<u64> for ItemHash {
    fn from(n: u64) -> Self {
        Self(n.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ItemHashVisitor;

        impl de::Visitor<'_> for ItemHashVisitor {
            type Value = ItemHash;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an item hash as a number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ItemHash, E> {
                Ok(ItemHash(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ItemHash, E> {
                Ok(ItemHash(v.to_string()))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ItemHash, E> {
                Ok(ItemHash(v.to_string()))
            }
        }

        deserializer.deserialize_any(ItemHashVisitor)
    }
}

/// A purchasable or ownable item. Equality and hashing use the item hash only.
#[derive(Debug, Clone)]
pub struct Mod {
    pub item_hash: ItemHash,
    pub display_name: Option<String>,
    pub item_type: Option<i64>,
}

impl Mod {
    /// Identity-only mod, name unresolved.
    pub fn new(item_hash: impl Into<ItemHash>) -> Self {
        Self {
            item_hash: item_hash.into(),
            display_name: None,
            item_type: None,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_item_type(mut self, item_type: i64) -> Self {
        self.item_type = Some(item_type);
        self
    }
}

impl PartialEq for Mod {
    fn eq(&self, other: &Self) -> bool {
        self.item_hash == other.item_hash
    }
}

impl Eq for Mod {}

impl Hash for Mod {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.item_hash.hash(state);
    }
}

/// `Response.sales.data` of the vendors endpoint: vendor id to its sales.
///
/// Entries decode permissively: a malformed vendor, sale item, or field is dropped
/// instead of failing the whole document.
pub type VendorSalesDocument = HashMap<String, VendorSales>;

#[derive(Debug, Clone, Default)]
pub struct VendorSales {
    pub sale_items: BTreeMap<String, SaleItem>,
}

impl<'de> Deserialize<'de> for VendorSales {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        let sale_items = value
            .get("saleItems")
            .and_then(Value::as_object)
            .map(sale_items)
            .unwrap_or_default();

        Ok(Self { sale_items })
    }
}

fn sale_items(items: &Map<String, Value>) -> BTreeMap<String, SaleItem> {
    items
        .iter()
        .map(|(slot, item)| {
            let item_hash = item.get("itemHash").and_then(ItemHash::from_value);
            (slot.clone(), SaleItem { item_hash })
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct SaleItem {
    pub item_hash: Option<ItemHash>,
}

/// `Response.profileCollectibles.data.collectibles`: collectible id to its state.
pub type CollectiblesDocument = HashMap<String, CollectibleComponent>;

#[derive(Debug, Clone)]
pub struct CollectibleComponent {
    /// `None` when absent or not an integer.
    pub state: Option<i64>,
}

impl<'de> Deserialize<'de> for CollectibleComponent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self {
            state: value.get("state").and_then(Value::as_i64),
        })
    }
}

/// One per-user ownership record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collectible {
    pub id: ItemHash,
    pub state: i64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_item_hash_from_number_and_string_agree() {
        let from_number: ItemHash = serde_json::from_str("350061650").unwrap();
        let from_string: ItemHash = serde_json::from_str("\"350061650\"").unwrap();
        assert_eq!(from_number, from_string);
        assert_eq!(from_number.as_str(), "350061650");
    }

    #[test]
    fn test_item_hash_rejects_other_types() {
        assert!(serde_json::from_str::<ItemHash>("true").is_err());
        assert!(serde_json::from_str::<ItemHash>("{}").is_err());
    }

    #[test]
    fn test_mod_equality_by_hash() {
        let bare = Mod::new("0132");
        let named = Mod::new("0132")
            .with_display_name("Sunglasses of Dudeness")
            .with_item_type(19);
        assert_eq!(bare, named);
        assert_ne!(bare, Mod::new("0133"));

        let set: HashSet<Mod> = [bare, named].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_vendor_sales_tolerates_missing_fields() {
        let json = serde_json::json!({
            "350061650": { "saleItems": { "1": { "itemHash": 42 }, "2": {} } },
            "672118013": {}
        });

        let doc: VendorSalesDocument = serde_json::from_value(json).unwrap();

        assert_eq!(doc["350061650"].sale_items.len(), 2);
        assert!(doc["350061650"].sale_items["2"].item_hash.is_none());
        assert!(doc["672118013"].sale_items.is_empty());
    }

    #[test]
    fn test_malformed_sale_entries_are_dropped() {
        let json = serde_json::json!({
            "350061650": { "saleItems": { "0": { "itemHash": 132 }, "1": { "itemHash": true } } },
            "672118013": { "saleItems": { "0": { "itemHash": 1.5 } } },
            "863940356": { "saleItems": "closed" },
            "919809084": "not a vendor"
        });

        let doc: VendorSalesDocument = serde_json::from_value(json).unwrap();

        let ada = &doc["350061650"].sale_items;
        assert_eq!(ada["0"].item_hash, Some(ItemHash::from("132")));
        assert!(ada["1"].item_hash.is_none());
        assert!(doc["672118013"].sale_items["0"].item_hash.is_none());
        assert!(doc["863940356"].sale_items.is_empty());
        assert!(doc["919809084"].sale_items.is_empty());
    }

    #[test]
    fn test_malformed_collectible_entries_are_dropped() {
        let json = serde_json::json!({
            "0132": { "state": 65 },
            "9": { "state": "weird" },
            "10": { "state": 1.5 },
            "11": null
        });

        let doc: CollectiblesDocument = serde_json::from_value(json).unwrap();

        assert_eq!(doc["0132"].state, Some(65));
        assert!(doc["9"].state.is_none());
        assert!(doc["10"].state.is_none());
        assert!(doc["11"].state.is_none());
    }

    #[test]
    fn test_item_hash_from_loose_value() {
        use serde_json::json;

        assert_eq!(ItemHash::from_value(&json!(132)), Some(ItemHash::from("132")));
        assert_eq!(ItemHash::from_value(&json!(-7)), Some(ItemHash::from("-7")));
        assert_eq!(ItemHash::from_value(&json!("0132")), Some(ItemHash::from("0132")));
        assert!(ItemHash::from_value(&json!(1.5)).is_none());
        assert!(ItemHash::from_value(&json!(false)).is_none());
        assert!(ItemHash::from_value(&json!(null)).is_none());
    }
}

// ABOUTME: Manifest index of mod hashes to display names
// ABOUTME: Two-stage manifest resolution, mod filtering, and an optional per-path cache

use std::collections::HashMap;
use std::sync::Arc;

use modwatch_config::destiny::MOD_ITEM_TYPE;
use serde_json::{Map, Value};
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    client::BungieClient,
    error::DestinyResult,
    types::{ItemHash, Mod},
};

/// Item hash to display name, for mod definitions only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestIndex {
    names: HashMap<ItemHash, String>,
}

impl ManifestIndex {
    /// Index the mod definitions of a `DestinyInventoryItemDefinition` dictionary.
    ///
    /// Entries that are not mods or carry no hash are skipped. Duplicate hashes keep the
    /// entry that comes last in the catalog document.
    pub fn from_definitions(definitions: &Map<String, Value>) -> Self {
        let names = definitions
            .values()
            .filter_map(mod_definition)
            .map(|m| (m.item_hash, m.display_name.unwrap_or_default()))
            .collect();

        Self { names }
    }

    pub fn get(&self, item_hash: &ItemHash) -> Option<&str> {
        self.names.get(item_hash).map(String::as_str)
    }

    pub fn contains(&self, item_hash: &ItemHash) -> bool {
        self.names.contains_key(item_hash)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Attach display names, dropping mods the index does not know.
    pub fn resolve(&self, mods: Vec<Mod>) -> Vec<Mod> {
        mods.into_iter()
            .filter_map(|m| {
                let name = self.get(&m.item_hash)?.to_string();
                Some(m.with_display_name(name).with_item_type(MOD_ITEM_TYPE))
            })
            .collect()
    }
}

impl FromIterator<(ItemHash, String)> for ManifestIndex {
    fn from_iter<I: IntoIterator<Item = (ItemHash, String)>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().collect(),
        }
    }
}

/// A definition as a named mod, if it is one.
fn mod_definition(definition: &Value) -> Option<Mod> {
    let item_type = definition.get("itemType")?.as_f64()?;
    if item_type != MOD_ITEM_TYPE as f64 {
        return None;
    }

    let item_hash = match definition.get("hash")? {
        Value::Number(n) => ItemHash::from(n.to_string()),
        Value::String(s) => ItemHash::from(s.as_str()),
        _ => return None,
    };

    let name = definition
        .pointer("/displayProperties/name")
        .and_then(Value::as_str)
        .unwrap_or_default();

    Some(
        Mod::new(item_hash)
            .with_display_name(name)
            .with_item_type(MOD_ITEM_TYPE),
    )
}

#[derive(Debug)]
struct CachedManifest {
    content_path: String,
    index: Arc<ManifestIndex>,
}

/// Process-wide manifest index cache keyed by the world content path.
///
/// The path changes whenever Bungie publishes a new catalog, so a changed pointer
/// replaces the cached index.
#[derive(Debug, Default)]
pub struct ManifestCache {
    entry: RwLock<Option<CachedManifest>>,
}

impl ManifestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, content_path: &str) -> Option<Arc<ManifestIndex>> {
        self.entry
            .read()
            .await
            .as_ref()
            .filter(|cached| cached.content_path == content_path)
            .map(|cached| Arc::clone(&cached.index))
    }

    pub async fn store(&self, content_path: &str, index: Arc<ManifestIndex>) {
        *self.entry.write().await = Some(CachedManifest {
            content_path: content_path.to_string(),
            index,
        });
    }
}

/// Builds a [`ManifestIndex`] from the live manifest.
#[derive(Clone)]
pub struct ManifestIndexBuilder {
    client: BungieClient,
    cache: Option<Arc<ManifestCache>>,
}

impl ManifestIndexBuilder {
    pub fn new(client: BungieClient) -> Self {
        Self {
            client,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<ManifestCache>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Resolve the content path, fetch the item definitions, and index the mods.
    ///
    /// Directory and content failures surface as `ManifestDirectory` and
    /// `ManifestContent` respectively.
    pub async fn build(&self) -> DestinyResult<Arc<ManifestIndex>> {
        let content_path = self.client.manifest_content_path().await?;

        if let Some(cache) = &self.cache {
            if let Some(index) = cache.get(&content_path).await {
                debug!("Reusing cached manifest index for {}", content_path);
                return Ok(index);
            }
        }

        let definitions = self.client.inventory_item_definitions(&content_path).await?;
        let index = Arc::new(ManifestIndex::from_definitions(&definitions));
        info!(
            "Indexed {} mods from {} item definitions",
            index.len(),
            definitions.len()
        );

        if let Some(cache) = &self.cache {
            cache.store(&content_path, Arc::clone(&index)).await;
        }

        Ok(index)
    }
}

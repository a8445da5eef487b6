// ABOUTME: Destiny 2 catalog constants and Bungie endpoint construction
// ABOUTME: Every vendor id, item type, collectible state and component code lives here

/// Ada-1, the vendor whose mod stock is tracked.
pub const ADA_VENDOR_ID: &str = "350061650";

/// `itemType` code of armor and weapon mods in `DestinyInventoryItemDefinition`.
pub const MOD_ITEM_TYPE: i64 = 19;

/// Collectible `state` of an item the player has not acquired yet.
///
/// Compared by equality, not as a bit-test.
pub const COLLECTIBLE_NOT_ACQUIRED_STATE: i64 = 65;

/// `components` value selecting vendor sales.
pub const VENDOR_SALES_COMPONENT: u32 = 402;

/// `components` value selecting profile collectibles.
pub const COLLECTIBLES_COMPONENT: u32 = 800;

/// Membership type used in profile paths (Steam).
pub const MEMBERSHIP_TYPE: u32 = 3;

/// Locale key in `jsonWorldContentPaths`.
pub const MANIFEST_LOCALE: &str = "en";

/// Top-level key of the item definitions inside the world content file.
pub const INVENTORY_ITEM_DEFINITION: &str = "DestinyInventoryItemDefinition";

/// Refresh tokens are rotated once they are within this many days of expiring.
pub const REFRESH_SAFETY_MARGIN_DAYS: i64 = 1;

pub const DEFAULT_BUNGIE_BASE_URL: &str = "https://www.bungie.net/";

pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;

/// URL builder for every Bungie call modwatch makes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BungieEndpoints {
    base_url: String,
}

impl Default for BungieEndpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BUNGIE_BASE_URL)
    }
}

impl BungieEndpoints {
    /// Create endpoints rooted at `base_url`. A trailing slash is added when missing.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        Self { base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn token_url(&self) -> String {
        format!("{}platform/app/oauth/token/", self.base_url)
    }

    pub fn manifest_url(&self) -> String {
        format!("{}platform/destiny2/manifest/", self.base_url)
    }

    /// Resolve a content path returned by the manifest directory.
    pub fn content_url(&self, content_path: &str) -> String {
        format!("{}{}", self.base_url, content_path.trim_start_matches('/'))
    }

    pub fn profile_url(&self, destiny_id: &str) -> String {
        format!(
            "{}platform/destiny2/{}/profile/{}/",
            self.base_url, MEMBERSHIP_TYPE, destiny_id
        )
    }

    pub fn vendors_url(&self, destiny_id: &str, character_id: &str) -> String {
        format!(
            "{}Character/{}/Vendors/",
            self.profile_url(destiny_id),
            character_id
        )
    }
}

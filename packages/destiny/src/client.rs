// ABOUTME: HTTP client for the Bungie platform API
// ABOUTME: Typed fetches for the manifest, vendor sales, and profile collectibles

use std::collections::HashMap;

use modwatch_config::{
    destiny::{
        COLLECTIBLES_COMPONENT, INVENTORY_ITEM_DEFINITION, MANIFEST_LOCALE,
        VENDOR_SALES_COMPONENT,
    },
    BungieEndpoints,
};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, error};

use crate::{
    error::{DestinyError, DestinyResult},
    types::{CollectiblesDocument, VendorSalesDocument},
};

const API_KEY_HEADER: &str = "x-api-key";

/// Uniform failure of one HTTP exchange.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Request(reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Request(e)
        }
    }
}

/// Bungie's `{ "Response": ... }` envelope.
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    #[serde(rename = "Response")]
    response: T,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManifestDirectory {
    json_world_content_paths: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct Component<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct VendorsResponse {
    sales: Component<VendorSalesDocument>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProfileResponse {
    profile_collectibles: Component<CollectiblesData>,
}

#[derive(Debug, Deserialize)]
struct CollectiblesData {
    collectibles: CollectiblesDocument,
}

#[derive(Debug, Deserialize)]
struct WorldContent {
    #[serde(rename = "DestinyInventoryItemDefinition")]
    inventory_item_definition: Map<String, Value>,
}

/// Bungie platform client. Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct BungieClient {
    client: Client,
    endpoints: BungieEndpoints,
    api_key: String,
}

impl BungieClient {
    pub fn new(api_key: impl Into<String>, endpoints: BungieEndpoints) -> Self {
        Self {
            client: modwatch_auth::default_client(),
            endpoints,
            api_key: api_key.into(),
        }
    }

    /// Use a custom HTTP client (shared pool, timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    pub fn endpoints(&self) -> &BungieEndpoints {
        &self.endpoints
    }

    /// Path of the localized world content file, from the manifest directory.
    pub async fn manifest_content_path(&self) -> DestinyResult<String> {
        let url = self.endpoints.manifest_url();
        debug!("Fetching manifest directory from {}", url);

        let directory: Envelope<ManifestDirectory> = self
            .send(self.client.get(&url).header(API_KEY_HEADER, &self.api_key))
            .await
            .map_err(|e| stage_error(e, "manifest directory fetch", DestinyError::ManifestDirectory))?;

        directory
            .response
            .json_world_content_paths
            .get(MANIFEST_LOCALE)
            .cloned()
            .ok_or_else(|| {
                error!("Manifest directory has no '{}' content path", MANIFEST_LOCALE);
                DestinyError::ManifestDirectory(format!(
                    "no '{}' entry in jsonWorldContentPaths",
                    MANIFEST_LOCALE
                ))
            })
    }

    /// `DestinyInventoryItemDefinition` from the world content file at `content_path`.
    pub async fn inventory_item_definitions(
        &self,
        content_path: &str,
    ) -> DestinyResult<Map<String, Value>> {
        let url = self.endpoints.content_url(content_path);
        debug!("Fetching {} from {}", INVENTORY_ITEM_DEFINITION, url);

        let content: WorldContent = self
            .send(self.client.get(&url))
            .await
            .map_err(|e| stage_error(e, "manifest content fetch", DestinyError::ManifestContent))?;

        Ok(content.inventory_item_definition)
    }

    /// Sales of every vendor available to the character. Requires a user access token.
    pub async fn vendor_sales(
        &self,
        destiny_id: &str,
        character_id: &str,
        access_token: &str,
    ) -> DestinyResult<VendorSalesDocument> {
        let url = self.endpoints.vendors_url(destiny_id, character_id);
        debug!("Fetching vendor sales for character {}", character_id);

        let request = self
            .client
            .get(&url)
            .query(&[("components", VENDOR_SALES_COMPONENT)])
            .bearer_auth(access_token)
            .header(API_KEY_HEADER, &self.api_key);

        let vendors: Envelope<VendorsResponse> = self
            .send(request)
            .await
            .map_err(|e| stage_error(e, "vendor sales fetch", DestinyError::VendorFetch))?;

        Ok(vendors.response.sales.data)
    }

    /// Collectible states of the profile.
    pub async fn collectibles(&self, destiny_id: &str) -> DestinyResult<CollectiblesDocument> {
        let url = self.endpoints.profile_url(destiny_id);
        debug!("Fetching collectibles for profile {}", destiny_id);

        let request = self
            .client
            .get(&url)
            .query(&[("components", COLLECTIBLES_COMPONENT)])
            .header(API_KEY_HEADER, &self.api_key);

        let profile: Envelope<ProfileResponse> = self
            .send(request)
            .await
            .map_err(|e| stage_error(e, "collectibles fetch", DestinyError::CollectibleFetch))?;

        Ok(profile.response.profile_collectibles.data.collectibles)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TransportError> {
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Log a transport failure where it happened and map it to the stage's error kind.
fn stage_error(
    error: TransportError,
    operation: &'static str,
    kind: fn(String) -> DestinyError,
) -> DestinyError {
    error!("Bungie {} failed: {}", operation, error);
    match error {
        TransportError::Timeout => DestinyError::Timeout(operation),
        other => kind(other.to_string()),
    }
}

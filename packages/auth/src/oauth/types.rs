// ABOUTME: Core type definitions for the Bungie refresh-token grant
// ABOUTME: Client configuration, raw token response, and the resulting token info

use modwatch_config::BungieEndpoints;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Bungie application credentials and the token endpoint they are used against.
#[derive(Debug, Clone)]
pub struct OAuthClientConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_key: String,
    pub token_url: String,
}

impl OAuthClientConfig {
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        api_key: impl Into<String>,
        endpoints: &BungieEndpoints,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_key: api_key.into(),
            token_url: endpoints.token_url(),
        }
    }
}

/// Form body of a refresh-token grant.
#[derive(Debug, Serialize)]
pub struct RefreshTokenRequest<'a> {
    pub grant_type: &'a str, // "refresh_token"
    pub refresh_token: &'a str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Token response from the Bungie token endpoint
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>, // Seconds
    pub refresh_token: String,
    #[serde(deserialize_with = "number_or_string")]
    pub refresh_expires_in: String, // Seconds
    #[serde(deserialize_with = "number_or_string")]
    pub membership_id: String,
}

/// Outcome of one refresh exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub membership_id: String,
    /// Refresh-token lifetime in seconds, as an integer string.
    pub refresh_expires_in: String,
    pub refresh_token: String,
    pub access_token: String,
}

impl From<TokenResponse> for TokenInfo {
    fn from(response: TokenResponse) -> Self {
        Self {
            membership_id: response.membership_id,
            refresh_expires_in: response.refresh_expires_in,
            refresh_token: response.refresh_token,
            access_token: response.access_token,
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected number or string, got {}",
            other
        ))),
    }
}

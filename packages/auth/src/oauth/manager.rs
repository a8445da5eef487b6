// ABOUTME: Token manager orchestrating the refresh-token lifecycle
// ABOUTME: Checks expiration, exchanges refresh tokens, and persists every rotation

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use modwatch_config::destiny::DEFAULT_HTTP_TIMEOUT_SECS;
use modwatch_storage::{CredentialStore, UserCredential};
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::{debug, error, info, warn};

use crate::{
    error::{AuthError, AuthResult},
    oauth::{
        expiration::{expiration_from_lifetime, needs_refresh},
        types::{OAuthClientConfig, RefreshTokenRequest, TokenInfo, TokenResponse},
    },
};

const API_KEY_HEADER: &str = "x-api-key";

/// HTTP client whose every request is bounded by `timeout`.
pub fn bounded_client(timeout: Duration) -> Client {
    Client::builder().timeout(timeout).build().unwrap_or_else(|e| {
        warn!("Failed to build bounded HTTP client: {}", e);
        Client::default()
    })
}

/// Client used when the caller does not supply one.
pub fn default_client() -> Client {
    bounded_client(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
}

/// Token manager for Bungie refresh tokens.
///
/// The only component that writes user credential state.
pub struct TokenManager {
    config: OAuthClientConfig,
    store: Arc<dyn CredentialStore>,
    client: Client,
}

impl TokenManager {
    pub fn new(config: OAuthClientConfig, store: Arc<dyn CredentialStore>) -> Self {
        Self {
            config,
            store,
            client: default_client(),
        }
    }

    /// Use a custom HTTP client (shared pool, timeouts).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Rotate the user's refresh token if it is within a day of expiring.
    ///
    /// Returns the exchange result when a rotation happened. `user` is updated in place.
    pub async fn ensure_fresh(&self, user: &mut UserCredential) -> AuthResult<Option<TokenInfo>> {
        self.ensure_fresh_at(user, Utc::now()).await
    }

    pub async fn ensure_fresh_at(
        &self,
        user: &mut UserCredential,
        now: DateTime<Utc>,
    ) -> AuthResult<Option<TokenInfo>> {
        if !needs_refresh(&user.refresh_expiration, now) {
            debug!(
                "Refresh token for {} valid until {}",
                user.bungie_username, user.refresh_expiration
            );
            return Ok(None);
        }

        info!(
            "Refresh token for {} expires {}, rotating",
            user.bungie_username, user.refresh_expiration
        );
        self.rotate_at(user, now).await.map(Some)
    }

    /// Fresh credentials plus an access token for authenticated calls.
    ///
    /// Access tokens are never stored, so this always ends with exactly one exchange.
    pub async fn access_token(&self, user: &mut UserCredential) -> AuthResult<TokenInfo> {
        let now = Utc::now();
        match self.ensure_fresh_at(user, now).await? {
            Some(token) => Ok(token),
            None => self.rotate_at(user, now).await,
        }
    }

    /// Exchange the user's refresh token and persist the rotated one before returning.
    pub async fn rotate_at(
        &self,
        user: &mut UserCredential,
        now: DateTime<Utc>,
    ) -> AuthResult<TokenInfo> {
        let token = self.refresh(&user.refresh_token).await?;
        let expiration = expiration_from_lifetime(&token.refresh_expires_in, now)?;

        self.store
            .update_by_membership_id(&token.membership_id, &expiration, &token.refresh_token)
            .await
            .map_err(|e| {
                error!(
                    "Refreshed token for {} could not be persisted: {}",
                    token.membership_id, e
                );
                AuthError::Persistence {
                    membership_id: token.membership_id.clone(),
                    source: e,
                }
            })?;

        user.refresh_token = token.refresh_token.clone();
        user.refresh_expiration = expiration;

        info!(
            "✅ Rotated refresh token for {}, valid until {}",
            user.bungie_username, user.refresh_expiration
        );
        Ok(token)
    }

    /// Exchange a refresh token for a new token pair.
    pub async fn refresh(&self, refresh_token: &str) -> AuthResult<TokenInfo> {
        let request = RefreshTokenRequest {
            grant_type: "refresh_token",
            refresh_token,
            client_id: &self.config.client_id,
            client_secret: &self.config.client_secret,
        };

        let response = self
            .client
            .post(&self.config.token_url)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(API_KEY_HEADER, &self.config.api_key)
            .form(&request)
            .send()
            .await
            .map_err(|e| {
                error!("Token refresh request failed: {}", e);
                AuthError::from_transport(e, "token refresh")
            })?;

        if !response.status().is_success() {
            let status = response.status();
            // Don't leak the response body, it can echo the grant
            error!("Token refresh failed with status {}", status);
            return Err(AuthError::RefreshFailed(format!(
                "token endpoint returned {}",
                status
            )));
        }

        let token_response: TokenResponse = response.json().await.map_err(|e| {
            error!("Failed to parse token response: {}", e);
            AuthError::RefreshFailed(format!("failed to parse token response: {}", e))
        })?;

        Ok(token_response.into())
    }
}

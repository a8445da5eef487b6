// ABOUTME: Integration tests for the token manager
// ABOUTME: Exercises the refresh grant against a mock token endpoint and a recording store

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use modwatch_auth::{bounded_client, AuthError, OAuthClientConfig, TokenManager};
use modwatch_config::BungieEndpoints;
use modwatch_storage::{CredentialStore, StorageError, StorageResult, UserCredential};

/// Credential store that records every update and can be told to fail
#[derive(Default)]
struct RecordingStore {
    updates: Mutex<Vec<(String, String, String)>>,
    fail: bool,
}

impl RecordingStore {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    fn updates(&self) -> Vec<(String, String, String)> {
        self.updates.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for RecordingStore {
    async fn update_by_membership_id(
        &self,
        membership_id: &str,
        refresh_expiration: &str,
        refresh_token: &str,
    ) -> StorageResult<()> {
        if self.fail {
            return Err(StorageError::NotFound(membership_id.to_string()));
        }
        self.updates.lock().unwrap().push((
            membership_id.to_string(),
            refresh_expiration.to_string(),
            refresh_token.to_string(),
        ));
        Ok(())
    }

    async fn fetch_all(&self) -> StorageResult<Vec<UserCredential>> {
        Ok(Vec::new())
    }
}

fn test_user(refresh_expiration: &str) -> UserCredential {
    UserCredential {
        bungie_username: "guardian".to_string(),
        bungie_membership_id: "1234".to_string(),
        destiny_id: "4611".to_string(),
        destiny_character_id: "2305".to_string(),
        refresh_token: "old-refresh-token".to_string(),
        refresh_expiration: refresh_expiration.to_string(),
        discord_id: None,
        discord_channel_id: None,
    }
}

fn token_body() -> serde_json::Value {
    serde_json::json!({
        "access_token": "new-access-token",
        "token_type": "Bearer",
        "expires_in": 3600,
        "refresh_token": "new-refresh-token",
        "refresh_expires_in": 7776000,
        "membership_id": "1234"
    })
}

fn manager(server: &MockServer, store: Arc<dyn CredentialStore>) -> TokenManager {
    let endpoints = BungieEndpoints::new(server.uri());
    let config = OAuthClientConfig::new("client-id", "client-secret", "api-key", &endpoints);
    TokenManager::new(config, store)
}

#[tokio::test]
async fn test_refresh_posts_form_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/platform/app/oauth/token/"))
        .and(header("x-api-key", "api-key"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old-refresh-token"))
        .and(body_string_contains("client_id=client-id"))
        .and(body_string_contains("client_secret=client-secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let store = Arc::new(RecordingStore::default());
    let token = manager(&server, store)
        .refresh("old-refresh-token")
        .await
        .unwrap();

    assert_eq!(token.access_token, "new-access-token");
    assert_eq!(token.refresh_token, "new-refresh-token");
    assert_eq!(token.refresh_expires_in, "7776000");
    assert_eq!(token.membership_id, "1234");
}

#[tokio::test]
async fn test_refresh_rejected_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/platform/app/oauth/token/"))
        .respond_with(ResponseTemplate::new(400).set_body_json(
            serde_json::json!({"error": "invalid_grant"}),
        ))
        .mount(&server)
        .await;

    let store = Arc::new(RecordingStore::default());
    let result = manager(&server, store.clone()).refresh("revoked").await;

    assert!(matches!(result, Err(AuthError::RefreshFailed(_))));
    assert!(store.updates().is_empty());
}

#[tokio::test]
async fn test_slow_token_endpoint_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/platform/app/oauth/token/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(token_body())
                .set_delay(std::time::Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let store = Arc::new(RecordingStore::default());
    let result = manager(&server, store.clone())
        .with_http_client(bounded_client(std::time::Duration::from_millis(200)))
        .refresh("old-refresh-token")
        .await;

    assert!(matches!(result, Err(AuthError::Timeout("token refresh"))));
    assert!(store.updates().is_empty());
}

#[tokio::test]
async fn test_ensure_fresh_skips_valid_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(0)
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut user = test_user("2026-03-20T12:00:00Z");
    let store = Arc::new(RecordingStore::default());

    let rotated = manager(&server, store.clone())
        .ensure_fresh_at(&mut user, now)
        .await
        .unwrap();

    assert!(rotated.is_none());
    assert!(store.updates().is_empty());
    assert_eq!(user.refresh_token, "old-refresh-token");
}

#[tokio::test]
async fn test_ensure_fresh_rotates_and_persists_due_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/platform/app/oauth/token/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut user = test_user(&(now + Duration::hours(12)).to_rfc3339());
    let store = Arc::new(RecordingStore::default());

    let rotated = manager(&server, store.clone())
        .ensure_fresh_at(&mut user, now)
        .await
        .unwrap();

    assert!(rotated.is_some());
    assert_eq!(
        store.updates(),
        vec![(
            "1234".to_string(),
            "2026-06-08T12:00:00Z".to_string(),
            "new-refresh-token".to_string()
        )]
    );
    assert_eq!(user.refresh_token, "new-refresh-token");
    assert_eq!(user.refresh_expiration, "2026-06-08T12:00:00Z");
}

#[tokio::test]
async fn test_persistence_failure_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .mount(&server)
        .await;

    let now = Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap();
    let mut user = test_user("2026-03-01T00:00:00Z");
    let store: Arc<dyn CredentialStore> = Arc::new(RecordingStore::failing());

    let result = manager(&server, store).ensure_fresh_at(&mut user, now).await;

    match result {
        Err(AuthError::Persistence { membership_id, .. }) => assert_eq!(membership_id, "1234"),
        other => panic!("Expected Persistence error, got {:?}", other),
    }
    // Unsaved rotation must not leak into the caller's copy
    assert_eq!(user.refresh_token, "old-refresh-token");
}

#[tokio::test]
async fn test_access_token_exchanges_once_when_not_due() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = test_user(&(Utc::now() + Duration::days(30)).to_rfc3339());
    let store = Arc::new(RecordingStore::default());

    let token = manager(&server, store.clone())
        .access_token(&mut user)
        .await
        .unwrap();

    assert_eq!(token.access_token, "new-access-token");
    assert_eq!(store.updates().len(), 1);
}

#[tokio::test]
async fn test_access_token_exchanges_once_when_due() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body()))
        .expect(1)
        .mount(&server)
        .await;

    let mut user = test_user("2020-01-01T00:00:00Z");
    let store = Arc::new(RecordingStore::default());

    manager(&server, store.clone())
        .access_token(&mut user)
        .await
        .unwrap();

    assert_eq!(store.updates().len(), 1);
}

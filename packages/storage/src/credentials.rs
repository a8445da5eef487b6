// ABOUTME: Credential store seam and its SQLite implementation
// ABOUTME: Only the token lifecycle writes through update_by_membership_id

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, error};

use crate::{
    error::{StorageError, StorageResult},
    models::UserCredential,
};

/// Persisted user credentials.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Store a rotated refresh token and its absolute expiration for a membership.
    async fn update_by_membership_id(
        &self,
        membership_id: &str,
        refresh_expiration: &str,
        refresh_token: &str,
    ) -> StorageResult<()>;

    /// Every tracked user.
    async fn fetch_all(&self) -> StorageResult<Vec<UserCredential>>;
}

/// `CredentialStore` backed by the `users` table.
#[derive(Clone)]
pub struct SqliteCredentialStore {
    pool: SqlitePool,
}

impl SqliteCredentialStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Apply the bundled migrations.
    pub async fn migrate(&self) -> StorageResult<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// Insert a user or replace every field of an existing one.
    pub async fn upsert(&self, user: &UserCredential) -> StorageResult<()> {
        debug!("Upserting user {}", user.bungie_membership_id);

        sqlx::query(
            r#"
            INSERT INTO users (
                bungie_membership_id, bungie_username, destiny_id, destiny_character_id,
                refresh_token, refresh_expiration, discord_id, discord_channel_id,
                created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, unixepoch(), unixepoch())
            ON CONFLICT(bungie_membership_id) DO UPDATE SET
                bungie_username = excluded.bungie_username,
                destiny_id = excluded.destiny_id,
                destiny_character_id = excluded.destiny_character_id,
                refresh_token = excluded.refresh_token,
                refresh_expiration = excluded.refresh_expiration,
                discord_id = excluded.discord_id,
                discord_channel_id = excluded.discord_channel_id,
                updated_at = unixepoch()
            "#,
        )
        .bind(&user.bungie_membership_id)
        .bind(&user.bungie_username)
        .bind(&user.destiny_id)
        .bind(&user.destiny_character_id)
        .bind(&user.refresh_token)
        .bind(&user.refresh_expiration)
        .bind(&user.discord_id)
        .bind(&user.discord_channel_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    pub async fn get_by_membership_id(
        &self,
        membership_id: &str,
    ) -> StorageResult<Option<UserCredential>> {
        let user = sqlx::query_as::<_, UserCredential>(
            r#"
            SELECT bungie_username, bungie_membership_id, destiny_id, destiny_character_id,
                   refresh_token, refresh_expiration, discord_id, discord_channel_id
            FROM users
            WHERE bungie_membership_id = ?
            "#,
        )
        .bind(membership_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn update_by_membership_id(
        &self,
        membership_id: &str,
        refresh_expiration: &str,
        refresh_token: &str,
    ) -> StorageResult<()> {
        debug!("Updating refresh token for membership {}", membership_id);

        let result = sqlx::query(
            r#"
            UPDATE users
            SET refresh_expiration = ?, refresh_token = ?, updated_at = unixepoch()
            WHERE bungie_membership_id = ?
            "#,
        )
        .bind(refresh_expiration)
        .bind(refresh_token)
        .bind(membership_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to update user {}: {}", membership_id, e);
            StorageError::UpdateFailed(membership_id.to_string(), e)
        })?;

        if result.rows_affected() == 0 {
            error!("No user record for membership {}", membership_id);
            return Err(StorageError::NotFound(membership_id.to_string()));
        }

        Ok(())
    }

    async fn fetch_all(&self) -> StorageResult<Vec<UserCredential>> {
        let users = sqlx::query_as::<_, UserCredential>(
            r#"
            SELECT bungie_username, bungie_membership_id, destiny_id, destiny_character_id,
                   refresh_token, refresh_expiration, discord_id, discord_channel_id
            FROM users
            ORDER BY bungie_username
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Failed to fetch users: {}", e);
            StorageError::Database(e)
        })?;

        debug!("Fetched {} users", users.len());
        Ok(users)
    }
}

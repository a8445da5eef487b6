// ABOUTME: Error types for credential persistence

use thiserror::Error;

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("The record for {0} could not be updated")]
    UpdateFailed(String, #[source] sqlx::Error),

    #[error("No user record for membership id {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

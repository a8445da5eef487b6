// ABOUTME: Persistence layer for tracked users and their refresh tokens
// ABOUTME: Defines the CredentialStore seam and its SQLite implementation

pub mod credentials;
pub mod error;
pub mod models;

pub use credentials::{CredentialStore, SqliteCredentialStore};
pub use error::{StorageError, StorageResult};
pub use models::UserCredential;

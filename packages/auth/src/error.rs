// ABOUTME: Error types for token refresh and token persistence
// ABOUTME: Distinguishes a rejected exchange from a refresh that could not be saved

use modwatch_storage::StorageError;
use thiserror::Error;

pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Could not retrieve access token information: {0}")]
    RefreshFailed(String),

    #[error("Timed out during {0}")]
    Timeout(&'static str),

    /// The exchange succeeded but the rotated token was not stored. The in-memory token is
    /// still valid; the next run will refresh again.
    #[error("Refreshed token for {membership_id} could not be persisted")]
    Persistence {
        membership_id: String,
        #[source]
        source: StorageError,
    },

    #[error("Invalid refresh token lifetime: {0}")]
    InvalidLifetime(String),
}

impl AuthError {
    pub(crate) fn from_transport(error: reqwest::Error, operation: &'static str) -> Self {
        if error.is_timeout() {
            Self::Timeout(operation)
        } else {
            Self::RefreshFailed(error.to_string())
        }
    }
}

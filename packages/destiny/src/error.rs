// ABOUTME: Error types for Bungie fetches and the reconciliation boundary
// ABOUTME: Each stage has its own kind; the pipeline collapses them into one

use modwatch_auth::AuthError;
use thiserror::Error;

pub type DestinyResult<T> = Result<T, DestinyError>;

#[derive(Error, Debug)]
pub enum DestinyError {
    #[error("Could not retrieve Destiny manifest file name: {0}")]
    ManifestDirectory(String),

    #[error("Could not retrieve Destiny inventory item definition: {0}")]
    ManifestContent(String),

    #[error("Could not retrieve Destiny vendor information: {0}")]
    VendorFetch(String),

    #[error("Could not retrieve Destiny collectible information: {0}")]
    CollectibleFetch(String),

    #[error("Timed out during {0}")]
    Timeout(&'static str),

    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Any failure inside the reconciliation flow. The original kind is kept as the source.
    #[error("Problem with retrieving the mods for sale from Ada-1")]
    Reconciliation(#[source] Box<DestinyError>),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl DestinyError {
    /// The stage error underneath a reconciliation wrapper.
    pub fn root(&self) -> &DestinyError {
        match self {
            Self::Reconciliation(inner) => inner.root(),
            other => other,
        }
    }
}

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Notification delivery failed: {0}")]
    Delivery(String),
}

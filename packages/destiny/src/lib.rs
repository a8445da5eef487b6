// ABOUTME: Destiny 2 data acquisition and reconciliation for modwatch
// ABOUTME: Finds the mods Ada-1 sells that a player has not collected yet

pub mod client;
pub mod collectibles;
pub mod error;
pub mod manifest;
pub mod pipeline;
pub mod types;
pub mod vendor;
pub mod watcher;

// Re-export main types
pub use client::{BungieClient, TransportError};
pub use error::{DestinyError, DestinyResult, NotifyError};
pub use manifest::{ManifestCache, ManifestIndex, ManifestIndexBuilder};
pub use pipeline::ModReconciler;
pub use types::{ItemHash, Mod};
pub use watcher::{ModWatcher, Notifier};

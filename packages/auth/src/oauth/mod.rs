// ABOUTME: OAuth module for the Bungie refresh-token grant
// ABOUTME: Includes expiration math, wire types, and the token manager

pub mod expiration;
pub mod manager;
pub mod types;

pub use manager::{bounded_client, default_client, TokenManager};
pub use types::{OAuthClientConfig, TokenInfo, TokenResponse};

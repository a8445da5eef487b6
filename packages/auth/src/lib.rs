// ABOUTME: modwatch authentication library for the Bungie OAuth refresh-token lifecycle
// ABOUTME: Detects near-expiry refresh tokens, rotates them, and persists the result

pub mod error;
pub mod oauth;

// Re-export main types
pub use error::{AuthError, AuthResult};
pub use oauth::{
    bounded_client, default_client, OAuthClientConfig, TokenInfo, TokenManager, TokenResponse,
};

// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across modwatch

// Bungie API credentials
pub const DESTINY_API_KEY: &str = "DESTINY_API_KEY";
pub const DESTINY_OAUTH_CLIENT_ID: &str = "DESTINY_OAUTH_CLIENT_ID";
pub const DESTINY_OAUTH_SECRET: &str = "DESTINY_OAUTH_SECRET";
pub const BUNGIE_BASE_URL: &str = "BUNGIE_BASE_URL";

// Persistence
pub const DATABASE_URL: &str = "DATABASE_URL";

// Server Configuration
pub const MODWATCH_PORT: &str = "MODWATCH_PORT";
pub const PORT: &str = "PORT"; // Legacy

// HTTP client
pub const MODWATCH_HTTP_TIMEOUT_SECS: &str = "MODWATCH_HTTP_TIMEOUT_SECS";
pub const MODWATCH_HTTP_CONNECT_TIMEOUT_SECS: &str = "MODWATCH_HTTP_CONNECT_TIMEOUT_SECS";

// Manifest
pub const MODWATCH_MANIFEST_CACHE: &str = "MODWATCH_MANIFEST_CACHE";

// Logging
pub const RUST_LOG: &str = "RUST_LOG";

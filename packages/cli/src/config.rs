use std::env;
use std::num::ParseIntError;
use std::time::Duration;

use modwatch_config::{
    constants,
    destiny::{DEFAULT_BUNGIE_BASE_URL, DEFAULT_HTTP_TIMEOUT_SECS},
    BungieEndpoints,
};
use thiserror::Error;

const DEFAULT_PORT: u16 = 3002;
const DEFAULT_DATABASE_URL: &str = "sqlite://modwatch.db?mode=rwc";
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("Invalid number in {0}: {1}")]
    InvalidNumber(&'static str, #[source] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid boolean in {0}: {1}")]
    InvalidBool(&'static str, String),
    #[error("Timeout in {0} must be greater than zero")]
    ZeroTimeout(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub api_key: String,
    pub oauth_client_id: String,
    pub oauth_secret: String,
    pub bungie_base_url: String,
    pub http_timeout: Duration,
    pub http_connect_timeout: Duration,
    pub manifest_cache: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let api_key = required(constants::DESTINY_API_KEY)?;
        let oauth_client_id = required(constants::DESTINY_OAUTH_CLIENT_ID)?;
        let oauth_secret = required(constants::DESTINY_OAUTH_SECRET)?;

        let port = match lookup(constants::MODWATCH_PORT).or_else(|| lookup(constants::PORT)) {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidNumber(constants::MODWATCH_PORT, e))?,
            None => DEFAULT_PORT,
        };

        // Validate port is in valid range
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let database_url = lookup(constants::DATABASE_URL)
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bungie_base_url = lookup(constants::BUNGIE_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BUNGIE_BASE_URL.to_string());

        let http_timeout = parse_secs(
            &lookup,
            constants::MODWATCH_HTTP_TIMEOUT_SECS,
            DEFAULT_HTTP_TIMEOUT_SECS,
        )?;
        let http_connect_timeout = parse_secs(
            &lookup,
            constants::MODWATCH_HTTP_CONNECT_TIMEOUT_SECS,
            DEFAULT_CONNECT_TIMEOUT_SECS,
        )?;

        let manifest_cache = match lookup(constants::MODWATCH_MANIFEST_CACHE) {
            Some(raw) => raw
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .map_err(|_| ConfigError::InvalidBool(constants::MODWATCH_MANIFEST_CACHE, raw))?,
            None => false,
        };

        Ok(Config {
            port,
            database_url,
            api_key,
            oauth_client_id,
            oauth_secret,
            bungie_base_url,
            http_timeout,
            http_connect_timeout,
            manifest_cache,
        })
    }

    pub fn endpoints(&self) -> BungieEndpoints {
        BungieEndpoints::new(self.bungie_base_url.clone())
    }
}

fn parse_secs<F>(lookup: &F, key: &'static str, default: u64) -> Result<Duration, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let secs = match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidNumber(key, e))?,
        None => default,
    };

    if secs == 0 {
        return Err(ConfigError::ZeroTimeout(key));
    }

    Ok(Duration::from_secs(secs))
}

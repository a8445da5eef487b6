use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use modwatch_auth::{OAuthClientConfig, TokenManager};
use modwatch_destiny::{
    BungieClient, ManifestCache, ManifestIndexBuilder, ModReconciler, ModWatcher, Notifier,
};
use modwatch_storage::{CredentialStore, SqliteCredentialStore};
use sqlx::sqlite::SqlitePoolOptions;
use tracing::info;
use tracing_subscriber::EnvFilter;

pub mod api;
pub mod config;
pub mod error;
pub mod notifier;


use api::AppState;
use config::Config;
use notifier::LogNotifier;

/// Wire the token manager, reconciler and notifier into one watcher.
pub fn build_watcher(
    config: &Config,
    http: reqwest::Client,
    store: Arc<dyn CredentialStore>,
    notifier: Arc<dyn Notifier>,
) -> ModWatcher {
    let endpoints = config.endpoints();

    let oauth = OAuthClientConfig::new(
        config.oauth_client_id.clone(),
        config.oauth_secret.clone(),
        config.api_key.clone(),
        &endpoints,
    );
    let tokens = TokenManager::new(oauth, store).with_http_client(http.clone());

    let bungie = BungieClient::new(config.api_key.clone(), endpoints).with_http_client(http);
    let mut manifest = ManifestIndexBuilder::new(bungie.clone());
    if config.manifest_cache {
        manifest = manifest.with_cache(Arc::new(ManifestCache::new()));
    }

    ModWatcher::new(
        Arc::new(tokens),
        ModReconciler::new(bungie, manifest),
        notifier,
    )
}

pub fn build_http_client(config: &Config) -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(config.http_timeout)
        .connect_timeout(config.http_connect_timeout)
        .build()
}

pub async fn run_server() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let pool = SqlitePoolOptions::new()
        .connect(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;
    let store = SqliteCredentialStore::new(pool);
    store.migrate().await.context("Failed to run migrations")?;

    let http = build_http_client(&config).context("Failed to build HTTP client")?;
    let watcher = build_watcher(&config, http, Arc::new(store), Arc::new(LogNotifier));

    if config.manifest_cache {
        info!("Manifest cache enabled");
    }

    let app = api::create_router(AppState {
        watcher: Arc::new(watcher),
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

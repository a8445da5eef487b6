use axum::{
    routing::{get, post},
    Router,
};
use modwatch_destiny::ModWatcher;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod health;
pub mod notify;

#[derive(Clone)]
pub struct AppState {
    pub watcher: Arc<ModWatcher>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_check))
        .route("/notify", post(notify::notify))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

use axum::{extract::State, Json};
use modwatch_storage::UserCredential;
use serde::Deserialize;
use tracing::info;

use super::AppState;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub user: UserCredential,
}

/// Run one watch pass for the posted user.
pub async fn notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<String, AppError> {
    let username = request.user.bungie_username.clone();
    info!("Received notify trigger for {}", username);

    state.watcher.process(request.user).await?;

    Ok(format!("{} notified", username))
}

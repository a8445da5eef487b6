use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use modwatch_auth::AuthError;
use modwatch_destiny::DestinyError;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

/// Error type returned by every handler
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Watch(#[from] DestinyError),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl AppError {
    /// Upstream Bungie failures map to 502; anything we failed to do ourselves is a 500.
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Watch(err) => match err.root() {
                DestinyError::ManifestDirectory(_)
                | DestinyError::ManifestContent(_)
                | DestinyError::VendorFetch(_)
                | DestinyError::CollectibleFetch(_)
                | DestinyError::Timeout(_) => StatusCode::BAD_GATEWAY,
                DestinyError::Auth(auth) => match auth {
                    AuthError::RefreshFailed(_)
                    | AuthError::Timeout(_)
                    | AuthError::InvalidLifetime(_) => StatusCode::BAD_GATEWAY,
                    AuthError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                },
                DestinyError::Notify(_) | DestinyError::Reconciliation(_) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Watch(err) => {
                error!(status = %status, error = %err, cause = %err.root(), "Watch run failed");
            }
            AppError::Internal(err) => {
                error!(error = %err, "Internal server error occurred");
            }
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

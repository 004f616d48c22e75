use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use shelf_feed::FeedError;
use shelf_types::api::{ErrorBody, ErrorDetail};
use thiserror::Error;

/// Handler error. Internal details are logged, never returned.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Feed(#[from] FeedError),

    #[error("Database error: {0}")]
    Database(#[from] anyhow::Error),

    #[error("Blocking task failed: {0}")]
    Blocking(#[from] tokio::task::JoinError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            ApiError::Feed(e) if e.is_schema_violation() => {
                tracing::error!("Feed schema violation: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FEED_SCHEMA_VIOLATION",
                    "The feed could not be decoded".to_string(),
                )
            }
            ApiError::Feed(e) => {
                tracing::error!("Feed error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "FEED_ERROR",
                    "The feed could not be loaded".to_string(),
                )
            }
            ApiError::Database(e) => {
                tracing::error!("Database error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            ApiError::Blocking(e) => {
                tracing::error!("spawn_blocking join error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}

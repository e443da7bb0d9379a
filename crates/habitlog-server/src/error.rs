//! Mapping from storage failures to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use habitlog_core::api::ErrorBody;
use habitlog_core::StorageError;

/// Handler failure. Every variant is a 500; the body tells a read problem
/// apart from a failed save.
#[derive(Debug)]
pub enum ApiFailure {
    Internal(String),
    SaveFailed(String),
}

impl From<StorageError> for ApiFailure {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReadFailed { .. } => ApiFailure::Internal(err.to_string()),
            StorageError::WriteFailed { .. }
            | StorageError::Encode(_)
            | StorageError::Unavailable(_) => ApiFailure::SaveFailed(err.to_string()),
        }
    }
}

impl IntoResponse for ApiFailure {
    fn into_response(self) -> Response {
        let public = match &self {
            ApiFailure::Internal(detail) => {
                tracing::error!(%detail, "request failed");
                "Internal server error"
            }
            ApiFailure::SaveFailed(detail) => {
                tracing::error!(%detail, "failed to save habit data");
                "Failed to save data"
            }
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody {
                error: public.to_string(),
            }),
        )
            .into_response()
    }
}

// src/api/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use super::auth::AuthError;
use crate::journal::JournalError;
use crate::monitor::JournalMetrics;

/// API 錯誤，回應格式為 `{ "error": message }`
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Journal(#[from] JournalError),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Journal(JournalError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Journal(JournalError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Journal(JournalError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Journal(JournalError::Storage(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(AuthError::Body) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            ApiError::Journal(err @ JournalError::Storage(_)) => {
                tracing::error!(error = ?err, "儲存層錯誤");
                "內部錯誤".to_string()
            }
            other => other.to_string(),
        };

        JournalMetrics::record_error(match &self {
            ApiError::Journal(err) => err.kind(),
            ApiError::Auth(_) => "auth",
        });

        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

//! Application error types
//!
//! Errors surfaced by the HTTP layer. Payment outcomes are never errors here:
//! `collect` and `disburse` always produce a `CanonicalResult`.

use crate::payments::error::RegistryError;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<RegistryError> for AppError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::UnknownProvider(_) => AppError::NotFound(err.to_string()),
        }
    }
}

#[cfg(feature = "server")]
mod response {
    use super::AppError;
    use axum::extract::rejection::JsonRejection;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use http::StatusCode;
    use serde_json::json;
    use tracing::error;

    impl AppError {
        pub fn status_code(&self) -> StatusCode {
            match self {
                AppError::NotFound(_) => StatusCode::NOT_FOUND,
                AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
                AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }
    }

    impl From<JsonRejection> for AppError {
        fn from(rejection: JsonRejection) -> Self {
            AppError::BadRequest(rejection.body_text())
        }
    }

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = self.status_code();
            let message = match &self {
                AppError::Internal(detail) => {
                    error!("Internal error: {}", detail);
                    "Internal server error".to_string()
                }
                other => other.to_string(),
            };

            let body = json!({
                "error": {
                    "code": self.code(),
                    "message": message,
                }
            });
            (status, Json(body)).into_response()
        }
    }
}

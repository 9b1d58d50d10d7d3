//! HTTP error mapping

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nimbus_core::DomainError;
use thiserror::Error;

use crate::response::ApiResponse;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {message}")]
    Validation {
        message: String,
        fields: BTreeMap<String, String>,
    },

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation { message, fields } => ApiError::Validation { message, fields },
            DomainError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            DomainError::DiagnosticsDisabled | DomainError::CommandRejected(_) => {
                ApiError::Forbidden(err.to_string())
            }
            DomainError::PasswordHashError(_)
            | DomainError::Persistence(_)
            | DomainError::CommandFailed(_) => ApiError::InternalError(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation { message, fields } => {
                tracing::warn!("Validation error: {}", message);
                (
                    StatusCode::BAD_REQUEST,
                    ApiResponse::<()>::error_with_fields("VALIDATION_ERROR", &message, fields),
                )
            }
            ApiError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, ApiResponse::error("AUTH_ERROR", &msg))
            }
            ApiError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, ApiResponse::error("FORBIDDEN", &msg))
            }
            ApiError::InternalError(msg) => {
                // Detail stays in the log; clients get a fixed message.
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiResponse::error("INTERNAL_ERROR", "Internal server error"),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

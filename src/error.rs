use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::repository::StoreError;
use crate::service::{PublishFailure, ServiceError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already deleted: {0}")]
    AlreadyDeleted(String),

    #[error("Color rejected: {0}")]
    ColorRejected(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Message publication failed")]
    PublishFailure,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            e @ ServiceError::NotFound(_) => AppError::NotFound(e.to_string()),
            e @ ServiceError::AlreadyDeleted(_) => AppError::AlreadyDeleted(e.to_string()),
            ServiceError::ColorRejected(e) => AppError::ColorRejected(e.to_string()),
            ServiceError::Store(e) => AppError::Store(e),
        }
    }
}

impl From<PublishFailure> for AppError {
    fn from(_: PublishFailure) -> Self {
        AppError::PublishFailure
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Store(e) => {
                tracing::error!("Store error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AppError::Validation(msg) => {
                tracing::warn!("Validation error: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::NotFound(msg) => {
                tracing::warn!("Not found: {}", msg);
                (StatusCode::NOT_FOUND, msg)
            }
            AppError::AlreadyDeleted(msg) => {
                tracing::warn!("Already deleted: {}", msg);
                (StatusCode::CONFLICT, msg)
            }
            AppError::ColorRejected(msg) => {
                tracing::warn!("Color rejected: {}", msg);
                (StatusCode::UNPROCESSABLE_ENTITY, msg)
            }
            AppError::Unauthorized(msg) => {
                tracing::warn!("Unauthorized: {}", msg);
                (StatusCode::UNAUTHORIZED, msg)
            }
            AppError::Forbidden(msg) => {
                tracing::warn!("Forbidden: {}", msg);
                (StatusCode::FORBIDDEN, msg)
            }
            // No body, the cause is logged by the publisher
            AppError::PublishFailure => return StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

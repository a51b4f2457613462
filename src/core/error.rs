use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use thiserror::Error;

use crate::core::database::is_transient;
use crate::features::auth::model::{Denial, DenyReason, RequestKind};
use crate::shared::constants::UNAUTHORIZED_PATH;
use crate::shared::types::{ApiResponse, FailureBody};

/// Body returned for every storage-side failure. The underlying reason is
/// logged, never echoed.
pub const OPERATION_FAILED_MESSAGE: &str = "Operation failed";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    /// The gate said no. Rendered as a redirect or a 401/403 depending on
    /// who is asking.
    #[error("Access denied: {0}")]
    AccessDenied(Denial),

    /// Identity provider or profile store could not answer. Not a
    /// permission decision.
    #[error("Transient resolution failure: {0}")]
    TransientResolution(String),

    /// Storage rejected or failed a gated operation.
    #[error("Operation failed: {0}")]
    OperationFailed(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message, errors) = match self {
            AppError::Database(ref e) if is_transient(e) => {
                tracing::error!("Database unavailable: {:?}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Database error occurred".to_string(),
                    None,
                )
            }
            AppError::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            AppError::Validation(ref msg) => (
                StatusCode::BAD_REQUEST,
                msg.clone(),
                Some(vec![msg.clone()]),
            ),
            AppError::BadRequest(ref msg) => (StatusCode::BAD_REQUEST, msg.clone(), None),
            AppError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                    None,
                )
            }
            AppError::AccessDenied(ref denial) => match denial.kind {
                RequestKind::Navigational => {
                    return Redirect::to(UNAUTHORIZED_PATH).into_response();
                }
                RequestKind::Api => match denial.reason {
                    DenyReason::Unauthenticated => (
                        StatusCode::UNAUTHORIZED,
                        "Authentication required".to_string(),
                        None,
                    ),
                    DenyReason::RoleNotPermitted(_) => (
                        StatusCode::FORBIDDEN,
                        "Insufficient role for this operation".to_string(),
                        None,
                    ),
                },
            },
            AppError::TransientResolution(ref msg) => {
                tracing::error!("Transient resolution failure: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                    None,
                )
            }
            AppError::OperationFailed(ref reason) => {
                tracing::warn!("Operation failed: {}", reason);
                let body = FailureBody {
                    error: OPERATION_FAILED_MESSAGE.to_string(),
                };
                return (StatusCode::BAD_REQUEST, Json(body)).into_response();
            }
            AppError::ExternalServiceError(ref msg) => {
                tracing::error!("External service error: {}", msg);
                (StatusCode::BAD_GATEWAY, msg.clone(), None)
            }
        };

        let body = Json(ApiResponse::<()>::error(Some(message), errors));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

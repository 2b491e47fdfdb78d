use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::{
    db::DbError,
    services::{HostedEmailError, ProvisioningError},
};

/// JSON error body returned by every admin endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: &'static str,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[derive(Debug)]
pub enum AdminError {
    NotFound(String),
    Conflict(String),
    Validation(String),
    NotConfigured(String),
    Upstream(String),
    Database(DbError),
    Internal(String),
}

impl From<DbError> for AdminError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => AdminError::NotFound("Resource not found".to_string()),
            DbError::Conflict(msg) => AdminError::Conflict(msg),
            _ => AdminError::Database(err),
        }
    }
}

impl From<ProvisioningError> for AdminError {
    fn from(err: ProvisioningError) -> Self {
        match err {
            ProvisioningError::NotConfigured(_) => AdminError::NotConfigured(err.to_string()),
            ProvisioningError::Database(db_err) => AdminError::from(db_err),
        }
    }
}

impl From<HostedEmailError> for AdminError {
    fn from(err: HostedEmailError) -> Self {
        match err {
            HostedEmailError::NotConfigured => AdminError::NotConfigured(err.to_string()),
            HostedEmailError::NotFound => AdminError::NotFound(err.to_string()),
            HostedEmailError::Platform(e) => AdminError::Upstream(e.to_string()),
            HostedEmailError::Persistence(_) => AdminError::Internal(err.to_string()),
            HostedEmailError::Database(db_err) => AdminError::from(db_err),
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AdminError::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg),
            AdminError::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg),
            AdminError::Validation(msg) => (StatusCode::BAD_REQUEST, "validation_error", msg),
            AdminError::NotConfigured(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, "not_configured", msg)
            }
            AdminError::Upstream(msg) => (StatusCode::BAD_GATEWAY, "upstream_error", msg),
            AdminError::Database(err) => {
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "database_error",
                    "An internal database error occurred".to_string(),
                )
            }
            AdminError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", msg)
            }
        };

        (status, Json(ErrorResponse::new(code, message))).into_response()
    }
}

//! API error handling
//!
//! Every error renders as `{"error": message}`. Authorization denials are
//! 403 with a fixed message; everything else is 400.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use minibank_auth::AuthError;
use minibank_core::CoreError;
use minibank_db::DbError;

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

/// API error taxonomy
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed JSON, failed field rules, bad path parameter
    #[error("{0}")]
    Validation(String),

    /// Token missing, invalid, or not matching the addressed account
    #[error("permission denied")]
    PermissionDenied,

    /// Login with an unknown number or a wrong password
    #[error("not authenticated")]
    Unauthenticated,

    #[error("{0}")]
    NotFound(String),

    /// Same-account transfer, insufficient funds, non-positive amount
    #[error("{0}")]
    BusinessRule(String),

    /// Persistence failure; details are logged, not returned
    #[error("storage error")]
    Store,

    #[error("internal error")]
    Internal,
}

impl ApiError {
    /// Get the HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::PermissionDenied => StatusCode::FORBIDDEN,
            Self::Validation(_)
            | Self::Unauthenticated
            | Self::NotFound(_)
            | Self::BusinessRule(_)
            | Self::Store
            | Self::Internal => StatusCode::BAD_REQUEST,
        }
    }
}

/// API error response body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}

impl From<&ApiError> for ErrorResponse {
    fn from(err: &ApiError) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(ErrorResponse::from(&self))).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::WeakPassword(msg) => Self::Validation(msg),
            AuthError::InvalidCredentials => Self::Unauthenticated,
            e if e.is_token_error() => Self::PermissionDenied,
            AuthError::PermissionDenied => Self::PermissionDenied,
            e => {
                tracing::error!(error = %e, "Credential service error");
                Self::Internal
            }
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            e @ DbError::NotFound(_) => Self::NotFound(e.to_string()),
            e => {
                tracing::error!(error = ?e, "Database error");
                Self::Store
            }
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            e if e.is_business_rule() => Self::BusinessRule(e.to_string()),
            e @ CoreError::AccountNotFound { .. } => Self::NotFound(e.to_string()),
            CoreError::Store(db) => db.into(),
            e => {
                tracing::error!(error = %e, "Core operation failed");
                Self::Internal
            }
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(err: validator::ValidationErrors) -> Self {
        let mut messages: Vec<String> = err
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |e| {
                    format!(
                        "{}: {}",
                        field,
                        e.message.as_ref().map(|m| m.as_ref()).unwrap_or("invalid")
                    )
                })
            })
            .collect();
        messages.sort();
        Self::Validation(messages.join(", "))
    }
}

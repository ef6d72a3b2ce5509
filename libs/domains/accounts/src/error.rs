use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_helpers::{AppError, ErrorCode};
use sea_orm::DbErr;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AccountError {
    #[error("Invalid provider")]
    InvalidProvider(String),

    #[error("Missing userId")]
    MissingUserId,

    #[error("Account is banned or closed.")]
    AccountBannedOrClosed,

    #[error("Account not found: {0}")]
    NotFound(Uuid),

    #[error("Failed to link account: {0}")]
    LinkFailed(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AccountResult<T> = Result<T, AccountError>;

impl From<tower_sessions::session::Error> for AccountError {
    fn from(err: tower_sessions::session::Error) -> Self {
        AccountError::Session(err.to_string())
    }
}

/// Everything without a fixed `{"error": ...}` body goes through the shared
/// structured error response.
impl From<AccountError> for AppError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::InvalidProvider(key) => {
                AppError::BadRequest(format!("Invalid provider: {}", key))
            }
            AccountError::MissingUserId => AppError::BadRequest("Missing userId".to_string()),
            AccountError::AccountBannedOrClosed => {
                AppError::Forbidden("Account is banned or closed.".to_string())
            }
            AccountError::NotFound(id) => AppError::NotFound(format!("Account {} not found", id)),
            AccountError::LinkFailed(details) => AppError::Coded {
                code: ErrorCode::LinkAccountFailed,
                message: details,
            },
            AccountError::Session(msg) => AppError::Session(msg),
            AccountError::Database(e) => AppError::Database(e),
            AccountError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        // The console front end matches on these two bodies verbatim
        match self {
            AccountError::InvalidProvider(key) => {
                tracing::info!(provider = %key, "Rejected unknown OAuth provider");
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "error": "Invalid provider" })),
                )
                    .into_response()
            }
            AccountError::MissingUserId => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "error": "Missing userId" })),
            )
                .into_response(),
            AccountError::AccountBannedOrClosed => (
                StatusCode::FORBIDDEN,
                Json(json!({ "error": "Account is banned or closed." })),
            )
                .into_response(),
            other => AppError::from(other).into_response(),
        }
    }
}

//! Type-safe error codes for API responses.
//!
//! Each code has a string form for clients, an integer for log correlation,
//! and a default message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! let code = ErrorCode::LinkAccountFailed;
//! assert_eq!(code.as_str(), "LINK_ACCOUNT_FAILED");
//! assert_eq!(code.code(), 2003);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    BadRequest,
    NotFound,
    Forbidden,
    Unauthorized,

    // Server errors (2000-2999)
    InternalError,
    DatabaseError,
    SessionError,
    LinkAccountFailed,
    ServiceUnavailable,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::SessionError => "SESSION_ERROR",
            ErrorCode::LinkAccountFailed => "LINK_ACCOUNT_FAILED",
            ErrorCode::ServiceUnavailable => "SERVICE_UNAVAILABLE",
        }
    }

    pub const fn code(&self) -> i32 {
        match self {
            ErrorCode::BadRequest => 1000,
            ErrorCode::NotFound => 1001,
            ErrorCode::Forbidden => 1002,
            ErrorCode::Unauthorized => 1003,
            ErrorCode::InternalError => 2000,
            ErrorCode::DatabaseError => 2001,
            ErrorCode::SessionError => 2002,
            ErrorCode::LinkAccountFailed => 2003,
            ErrorCode::ServiceUnavailable => 2004,
        }
    }

    pub const fn default_message(&self) -> &'static str {
        match self {
            ErrorCode::BadRequest => "The request could not be understood",
            ErrorCode::NotFound => "The requested resource was not found",
            ErrorCode::Forbidden => "Access to this resource is forbidden",
            ErrorCode::Unauthorized => "Authentication is required",
            ErrorCode::InternalError => "An internal error occurred",
            ErrorCode::DatabaseError => "A database error occurred",
            ErrorCode::SessionError => "Failed to establish session",
            ErrorCode::LinkAccountFailed => "Failed to link account.",
            ErrorCode::ServiceUnavailable => "Service temporarily unavailable",
        }
    }

    /// Server-side failures are logged at error level
    pub const fn is_server_error(&self) -> bool {
        self.code() >= 2000
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_serializes_screaming_snake_case() {
        let json = serde_json::to_string(&ErrorCode::LinkAccountFailed).unwrap();
        assert_eq!(json, "\"LINK_ACCOUNT_FAILED\"");
    }

    #[test]
    fn test_server_error_classification() {
        assert!(!ErrorCode::BadRequest.is_server_error());
        assert!(!ErrorCode::Forbidden.is_server_error());
        assert!(ErrorCode::DatabaseError.is_server_error());
        assert!(ErrorCode::SessionError.is_server_error());
    }
}

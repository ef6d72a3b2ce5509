use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::{ErrorCode, ErrorResponse};

/// Router fallback for unknown paths.
pub async fn not_found() -> Response {
    let code = ErrorCode::NotFound;
    let body = Json(ErrorResponse {
        code: code.code(),
        error: code.as_str().to_string(),
        message: code.default_message().to_string(),
        details: None,
    });

    (StatusCode::NOT_FOUND, body).into_response()
}

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use bankd_core::error::AuthError;

/// Application-level error type for HTTP handlers.
///
/// Wraps the domain [`AuthError`] and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// A bad request with a human-readable message (body binding or
    /// validation failures).
    #[error("bad request: {0}")]
    BadRequest(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::Auth(auth) => match auth {
                AuthError::UserAlreadyExists => {
                    (StatusCode::CONFLICT, "CONFLICT", auth.to_string())
                }
                AuthError::UserNotFound | AuthError::SessionNotFound => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", auth.to_string())
                }
                AuthError::InvalidCredentials
                | AuthError::TokenInvalid
                | AuthError::TokenExpired
                | AuthError::SessionBlocked
                | AuthError::SessionExpired
                | AuthError::SessionMismatch => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", auth.to_string())
                }
                // Construction-time failure; a running server never mints
                // this, but the mapping stays exhaustive.
                AuthError::KeyInvalid { .. } => internal(&auth.to_string()),
                AuthError::Internal(detail) => internal(detail),
            },
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Log the full detail server-side, return an opaque message to the caller.
fn internal(detail: &str) -> (StatusCode, &'static str, String) {
    tracing::error!(error = %detail, "internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "an internal error occurred".to_string(),
    )
}

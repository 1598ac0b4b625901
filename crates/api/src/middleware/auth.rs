//! Bearer-token extractor for protected routes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{DateTime, Utc};

use bankd_core::error::AuthError;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated principal extracted from an `Authorization: Bearer <token>`
/// header. Use as an extractor parameter on any handler that requires a
/// valid access token:
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> ApiResult<Json<()>> {
///     tracing::info!(username = %user.username, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The verified token's subject.
    pub username: String,
    /// When the presented access token expires.
    pub expires_at: DateTime<Utc>,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Auth(AuthError::TokenInvalid))?;

        let token = header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .ok_or(ApiError::Auth(AuthError::TokenInvalid))?;

        let payload = state.codec.verify(token)?;

        Ok(AuthUser {
            username: payload.subject,
            expires_at: payload.expires_at,
        })
    }
}

//! Handlers for user creation, login, and access-token renewal.

use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::header::USER_AGENT;
use axum::http::HeaderMap;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use bankd_db::models::user::UserResponse;

use crate::error::{ApiError, ApiResult};
use crate::middleware::auth::AuthUser;
use crate::service::{
    CreateUserParams, LoginUserParams, LoginUserResponse, RenewAccessTokenResponse,
};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(length(min = 3), custom(function = "alphanumeric"))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
    #[validate(length(min = 1))]
    pub full_name: String,
    #[validate(email)]
    pub email: String,
}

/// Request body for `POST /users/login`.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(length(min = 3), custom(function = "alphanumeric"))]
    pub username: String,
    #[validate(length(min = 6))]
    pub password: String,
}

/// Request body for `POST /tokens/renew_access`.
#[derive(Debug, Deserialize, Validate)]
pub struct RenewAccessTokenRequest {
    #[validate(length(min = 1))]
    pub refresh_token: String,
}

/// Response body for `GET /users/me`.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub username: String,
    pub token_expires_at: DateTime<Utc>,
}

fn alphanumeric(value: &str) -> Result<(), ValidationError> {
    if value.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ValidationError::new("alphanumeric"))
    }
}

fn validated<T: Validate>(req: T) -> Result<T, ApiError> {
    req.validate()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    Ok(req)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /users
///
/// Create a new user. The response never echoes the password in any form.
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserRequest>,
) -> ApiResult<Json<UserResponse>> {
    let input = validated(input)?;

    let user = state
        .auth
        .create_user(CreateUserParams {
            username: input.username,
            password: input.password,
            full_name: input.full_name,
            email: input.email,
        })
        .await?;

    Ok(Json(user))
}

/// POST /users/login
///
/// Authenticate with username + password. Returns access and refresh tokens
/// plus the id of the session backing the refresh token. The caller's
/// user agent and address are recorded on the session for audit.
pub async fn login_user(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(input): Json<LoginUserRequest>,
) -> ApiResult<Json<LoginUserResponse>> {
    let input = validated(input)?;

    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let client_ip = addr.ip().to_string();

    let response = state
        .auth
        .login_user(LoginUserParams {
            username: input.username,
            password: input.password,
            user_agent,
            client_ip,
        })
        .await?;

    Ok(Json(response))
}

/// POST /tokens/renew_access
///
/// Exchange a valid refresh token for a fresh access token. The refresh
/// token itself and its session are left untouched.
pub async fn renew_access_token(
    State(state): State<AppState>,
    Json(input): Json<RenewAccessTokenRequest>,
) -> ApiResult<Json<RenewAccessTokenResponse>> {
    let input = validated(input)?;

    let response = state.auth.renew_access_token(&input.refresh_token).await?;
    Ok(Json(response))
}

/// GET /users/me
///
/// Identify the caller from their bearer token.
pub async fn me(user: AuthUser) -> Json<MeResponse> {
    Json(MeResponse {
        username: user.username,
        token_expires_at: user.expires_at,
    })
}

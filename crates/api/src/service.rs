//! The identity and session service: user creation, login, access-token
//! renewal.
//!
//! The service is stateless; every operation re-reads current state through
//! the store, so a session blocked between two calls is seen immediately.
//! Operations are single-shot -- transient store failures propagate to the
//! caller, and credential or token verification failures are never retried.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use bankd_core::error::AuthError;
use bankd_core::password::{hash_password, verify_password};
use bankd_core::token::TokenCodec;
use bankd_db::models::session::CreateSession;
use bankd_db::models::user::{CreateUser, UserResponse};
use bankd_db::store::{AuthStore, StoreError};

/// Parameters for [`IdentityService::create_user`]. The password is still
/// plaintext here; it is hashed before the store ever sees it.
#[derive(Debug, Clone)]
pub struct CreateUserParams {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub email: String,
}

/// Parameters for [`IdentityService::login_user`]. `user_agent` and
/// `client_ip` are opaque audit strings supplied by the transport layer.
#[derive(Debug, Clone)]
pub struct LoginUserParams {
    pub username: String,
    pub password: String,
    pub user_agent: String,
    pub client_ip: String,
}

/// Successful login: both tokens, their expiries, the session id, and the
/// public user view. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct LoginUserResponse {
    pub session_id: Uuid,
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
    pub refresh_token: String,
    pub refresh_token_expires_at: DateTime<Utc>,
    pub user: UserResponse,
}

/// Successful renewal: a fresh access token only. The refresh token and its
/// session are untouched.
#[derive(Debug, Serialize)]
pub struct RenewAccessTokenResponse {
    pub access_token: String,
    pub access_token_expires_at: DateTime<Utc>,
}

/// The capability the request dispatcher is composed with. Handlers hold
/// this as `Arc<dyn IdentityService>` and call it directly; swapping in a
/// fake for tests swaps the whole service.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserResponse, AuthError>;

    async fn login_user(&self, params: LoginUserParams) -> Result<LoginUserResponse, AuthError>;

    async fn renew_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RenewAccessTokenResponse, AuthError>;
}

/// Production implementation, composed of the token codec and a store.
pub struct AuthService {
    store: Arc<dyn AuthStore>,
    codec: TokenCodec,
    access_token_duration: Duration,
    refresh_token_duration: Duration,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn AuthStore>,
        codec: TokenCodec,
        access_token_duration: Duration,
        refresh_token_duration: Duration,
    ) -> Self {
        Self {
            store,
            codec,
            access_token_duration,
            refresh_token_duration,
        }
    }
}

/// Wrap an unexpected store failure. The detail surfaces only in server-side
/// logs; clients see an opaque internal error.
fn internal(err: StoreError) -> AuthError {
    AuthError::Internal(format!("store failure: {err}"))
}

#[async_trait]
impl IdentityService for AuthService {
    async fn create_user(&self, params: CreateUserParams) -> Result<UserResponse, AuthError> {
        let hashed_password = hash_password(&params.password)?;

        let user = self
            .store
            .create_user(CreateUser {
                username: params.username,
                hashed_password,
                full_name: params.full_name,
                email: params.email,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict => AuthError::UserAlreadyExists,
                other => internal(other),
            })?;

        Ok(user.into())
    }

    async fn login_user(&self, params: LoginUserParams) -> Result<LoginUserResponse, AuthError> {
        let user = self
            .store
            .get_user(&params.username)
            .await
            .map_err(|e| match e {
                // Deliberately distinct from InvalidCredentials below: the
                // minor enumeration leak is accepted for clearer messaging.
                StoreError::NotFound => AuthError::UserNotFound,
                other => internal(other),
            })?;

        if !verify_password(&params.password, &user.hashed_password)? {
            return Err(AuthError::InvalidCredentials);
        }

        let (access_token, access_payload) = self
            .codec
            .create(&user.username, self.access_token_duration)?;
        let (refresh_token, refresh_payload) = self
            .codec
            .create(&user.username, self.refresh_token_duration)?;

        // Session creation happens after both the password check and token
        // minting: no session row ever exists for a failed login.
        let session = self
            .store
            .create_session(CreateSession {
                id: refresh_payload.id,
                username: user.username.clone(),
                refresh_token: refresh_token.clone(),
                user_agent: params.user_agent,
                client_ip: params.client_ip,
                is_blocked: false,
                expires_at: refresh_payload.expires_at,
            })
            .await
            .map_err(internal)?;

        Ok(LoginUserResponse {
            session_id: session.id,
            access_token,
            access_token_expires_at: access_payload.expires_at,
            refresh_token,
            refresh_token_expires_at: refresh_payload.expires_at,
            user: user.into(),
        })
    }

    async fn renew_access_token(
        &self,
        refresh_token: &str,
    ) -> Result<RenewAccessTokenResponse, AuthError> {
        // TokenInvalid / TokenExpired propagate unchanged.
        let payload = self.codec.verify(refresh_token)?;

        let session = self
            .store
            .get_session(payload.id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AuthError::SessionNotFound,
                other => internal(other),
            })?;

        if session.is_blocked {
            return Err(AuthError::SessionBlocked);
        }
        if session.expires_at <= Utc::now() {
            return Err(AuthError::SessionExpired);
        }
        // A refresh token replayed against a foreign session record fails
        // here, as does a token that no longer matches the stored string.
        if session.username != payload.subject || session.refresh_token != refresh_token {
            return Err(AuthError::SessionMismatch);
        }

        let (access_token, access_payload) = self
            .codec
            .create(&payload.subject, self.access_token_duration)?;

        Ok(RenewAccessTokenResponse {
            access_token,
            access_token_expires_at: access_payload.expires_at,
        })
    }
}

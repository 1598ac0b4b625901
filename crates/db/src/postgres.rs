//! Postgres-backed [`AuthStore`] implementation.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};
use crate::store::{AuthStore, StoreError};

/// Column lists shared across queries to avoid repetition.
const USER_COLUMNS: &str =
    "username, hashed_password, full_name, email, password_changed_at, created_at";
const SESSION_COLUMNS: &str =
    "id, username, refresh_token, user_agent, client_ip, is_blocked, expires_at, created_at";

/// PostgreSQL unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// The production store, backed by a sqlx connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a sqlx error to [`StoreError::Conflict`] if it is a unique-constraint
/// violation, passing everything else through.
fn classify_insert_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) {
            return StoreError::Conflict;
        }
    }
    StoreError::Database(err)
}

#[async_trait]
impl AuthStore for PgStore {
    async fn create_user(&self, input: CreateUser) -> Result<User, StoreError> {
        let query = format!(
            "INSERT INTO users (username, hashed_password, full_name, email)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.hashed_password)
            .bind(&input.full_name)
            .bind(&input.email)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_insert_error)
    }

    async fn get_user(&self, username: &str) -> Result<User, StoreError> {
        let query = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }

    async fn create_session(&self, input: CreateSession) -> Result<Session, StoreError> {
        let query = format!(
            "INSERT INTO sessions (id, username, refresh_token, user_agent, client_ip, is_blocked, expires_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, Session>(&query)
            .bind(input.id)
            .bind(&input.username)
            .bind(&input.refresh_token)
            .bind(&input.user_agent)
            .bind(&input.client_ip)
            .bind(input.is_blocked)
            .bind(input.expires_at)
            .fetch_one(&self.pool)
            .await
            .map_err(classify_insert_error)
    }

    async fn get_session(&self, id: Uuid) -> Result<Session, StoreError> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM sessions WHERE id = $1");
        sqlx::query_as::<_, Session>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StoreError::NotFound)
    }
}

//! Session model and DTOs.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// A session row from the `sessions` table.
///
/// The `id` equals the refresh token payload's id, binding one session to
/// exactly one refresh token. `is_blocked` is the revocation flag flipped by
/// an administrative path; the renewal path only ever reads it.
#[derive(Debug, Clone, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// DTO for creating a new session at login.
#[derive(Debug, Clone)]
pub struct CreateSession {
    pub id: Uuid,
    pub username: String,
    pub refresh_token: String,
    pub user_agent: String,
    pub client_ip: String,
    pub is_blocked: bool,
    pub expires_at: DateTime<Utc>,
}

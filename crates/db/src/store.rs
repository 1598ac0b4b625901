//! The persistence contract the identity service runs against.

use async_trait::async_trait;
use uuid::Uuid;

use crate::models::session::{CreateSession, Session};
use crate::models::user::{CreateUser, User};

/// Failures a store implementation can report.
///
/// `Conflict` must come from the datastore's own uniqueness-violation
/// signal, never from a pre-check-then-insert sequence -- that reintroduces
/// a TOCTOU race under concurrent signups.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record already exists")]
    Conflict,

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Persistence operations for users and sessions.
///
/// All methods are plain futures: dropping one cancels the underlying query,
/// so a caller that gives up never leaves the store doing unnecessary work.
/// Inserts are atomic; there is deliberately no session-update method, the
/// renewal path reads and never writes.
#[async_trait]
pub trait AuthStore: Send + Sync {
    /// Atomic insert; uniqueness violations on username or email surface as
    /// [`StoreError::Conflict`].
    async fn create_user(&self, input: CreateUser) -> Result<User, StoreError>;

    async fn get_user(&self, username: &str) -> Result<User, StoreError>;

    /// Atomic insert keyed by the session id.
    async fn create_session(&self, input: CreateSession) -> Result<Session, StoreError>;

    async fn get_session(&self, id: Uuid) -> Result<Session, StoreError>;
}

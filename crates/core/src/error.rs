use crate::token::TOKEN_KEY_SIZE;

/// Every failure the auth core can report, as a closed enumeration.
///
/// Matching on this enum at the API boundary is exhaustive and checked at
/// compile time; there are no free-floating error values to compare against.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserAlreadyExists,

    #[error("user not found")]
    UserNotFound,

    #[error("username or password is invalid")]
    InvalidCredentials,

    #[error("token is invalid")]
    TokenInvalid,

    #[error("token has expired")]
    TokenExpired,

    #[error("session not found")]
    SessionNotFound,

    #[error("session is blocked")]
    SessionBlocked,

    #[error("session has expired")]
    SessionExpired,

    #[error("session does not match token")]
    SessionMismatch,

    #[error("token key must be exactly {TOKEN_KEY_SIZE} bytes, got {len}")]
    KeyInvalid { len: usize },

    /// Unexpected store or codec failure. The detail is logged server-side;
    /// callers only ever see the opaque message.
    #[error("internal error: {0}")]
    Internal(String),
}

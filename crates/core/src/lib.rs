//! Domain core for the banking auth service.
//!
//! - [`error`] -- the closed error-kind enumeration shared by every layer.
//! - [`token`] -- authenticated-encryption bearer tokens (mint + verify).
//! - [`password`] -- Argon2id password hashing and verification.

pub mod error;
pub mod password;
pub mod token;

pub use error::AuthError;

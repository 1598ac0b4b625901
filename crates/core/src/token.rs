//! Authenticated-encryption bearer tokens.
//!
//! Tokens are opaque, URL-safe strings: a JSON [`TokenPayload`] encrypted
//! with AES-256-GCM under a random 96-bit nonce, emitted as unpadded
//! URL-safe base64 of `nonce || ciphertext`. The GCM tag makes every token
//! tamper-evident; the shared symmetric key means the service that mints a
//! token is the only one that can verify it.

use aes_gcm::aead::rand_core::{OsRng, RngCore};
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AuthError;

/// Required symmetric key length in bytes (AES-256).
pub const TOKEN_KEY_SIZE: usize = 32;

/// AES-GCM nonce length in bytes.
const NONCE_SIZE: usize = 12;

/// The structured claims carried inside every token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPayload {
    /// Unique token id (UUID v4), freshly generated per token. Doubles as
    /// the session id for refresh tokens.
    pub id: Uuid,
    /// The authenticated principal's username.
    pub subject: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl TokenPayload {
    fn new(subject: &str, duration: Duration) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            subject: subject.to_string(),
            issued_at: now,
            expires_at: now + duration,
        }
    }
}

/// Mints and verifies tokens under a fixed 32-byte symmetric key.
#[derive(Clone)]
pub struct TokenCodec {
    cipher: Aes256Gcm,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from the configured symmetric key.
    ///
    /// Fails with [`AuthError::KeyInvalid`] unless the key is exactly
    /// [`TOKEN_KEY_SIZE`] bytes. An undersized key weakens the
    /// authentication tag, so the length is a hard construction-time check.
    pub fn new(key: &[u8]) -> Result<Self, AuthError> {
        if key.len() != TOKEN_KEY_SIZE {
            return Err(AuthError::KeyInvalid { len: key.len() });
        }
        let key = Key::<Aes256Gcm>::from_slice(key);
        Ok(Self {
            cipher: Aes256Gcm::new(key),
        })
    }

    /// Mint a token for `subject` valid for `duration` from now.
    ///
    /// Returns both the opaque string and the payload so the caller can use
    /// the payload's `id` and `expires_at` for its own bookkeeping.
    pub fn create(
        &self,
        subject: &str,
        duration: Duration,
    ) -> Result<(String, TokenPayload), AuthError> {
        let payload = TokenPayload::new(subject, duration);
        let token = self.encode(&payload)?;
        Ok((token, payload))
    }

    /// Decode and authenticate a token, then check its expiry.
    ///
    /// Tampering, a wrong key, and malformed encoding all collapse to
    /// [`AuthError::TokenInvalid`] so the error reveals nothing about which
    /// check failed. An authentic but stale token is [`AuthError::TokenExpired`],
    /// kept distinct so callers can tell "log in again" from "access denied".
    pub fn verify(&self, token: &str) -> Result<TokenPayload, AuthError> {
        let raw = URL_SAFE_NO_PAD
            .decode(token)
            .map_err(|_| AuthError::TokenInvalid)?;
        if raw.len() <= NONCE_SIZE {
            return Err(AuthError::TokenInvalid);
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_SIZE);

        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| AuthError::TokenInvalid)?;

        let payload: TokenPayload =
            serde_json::from_slice(&plaintext).map_err(|_| AuthError::TokenInvalid)?;

        if payload.expires_at <= Utc::now() {
            return Err(AuthError::TokenExpired);
        }
        Ok(payload)
    }

    /// Encrypt a payload into its wire form.
    fn encode(&self, payload: &TokenPayload) -> Result<String, AuthError> {
        let plaintext = serde_json::to_vec(payload)
            .map_err(|e| AuthError::Internal(format!("payload serialization failed: {e}")))?;

        let mut nonce = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(Nonce::from_slice(&nonce), plaintext.as_slice())
            .map_err(|e| AuthError::Internal(format!("token encryption failed: {e}")))?;

        let mut raw = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        raw.extend_from_slice(&nonce);
        raw.extend_from_slice(&ciphertext);
        Ok(URL_SAFE_NO_PAD.encode(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn test_codec() -> TokenCodec {
        TokenCodec::new(&[0x42; TOKEN_KEY_SIZE]).expect("codec construction should succeed")
    }

    #[test]
    fn test_round_trip() {
        let codec = test_codec();
        let (token, payload) = codec
            .create("alice", Duration::minutes(15))
            .expect("minting should succeed");

        let verified = codec.verify(&token).expect("verification should succeed");
        assert_eq!(verified, payload);
        assert_eq!(verified.subject, "alice");
        assert!(verified.expires_at > verified.issued_at);
    }

    #[test]
    fn test_fresh_id_per_token() {
        let codec = test_codec();
        let (_, a) = codec.create("alice", Duration::minutes(15)).unwrap();
        let (_, b) = codec.create("alice", Duration::minutes(15)).unwrap();
        assert_ne!(a.id, b.id, "every token must carry a fresh id");
    }

    #[test]
    fn test_expired_token() {
        let codec = test_codec();

        // Encode an already-expired payload directly.
        let now = Utc::now();
        let payload = TokenPayload {
            id: Uuid::new_v4(),
            subject: "alice".to_string(),
            issued_at: now - Duration::minutes(10),
            expires_at: now - Duration::minutes(5),
        };
        let token = codec.encode(&payload).expect("encoding should succeed");

        assert_matches!(codec.verify(&token), Err(AuthError::TokenExpired));
    }

    #[test]
    fn test_tampered_token_is_invalid() {
        let codec = test_codec();
        let (token, _) = codec.create("alice", Duration::minutes(15)).unwrap();

        // Flip one character at every position; none may decode.
        for i in 0..token.len() {
            let mut bytes = token.clone().into_bytes();
            bytes[i] = if bytes[i] == b'A' { b'B' } else { b'A' };
            let tampered = String::from_utf8(bytes).unwrap();
            if tampered == token {
                continue;
            }
            assert_matches!(
                codec.verify(&tampered),
                Err(AuthError::TokenInvalid),
                "tampered token at position {i} must be rejected"
            );
        }
    }

    #[test]
    fn test_wrong_key_is_invalid() {
        let codec = test_codec();
        let other = TokenCodec::new(&[0x99; TOKEN_KEY_SIZE]).unwrap();

        let (token, _) = codec.create("alice", Duration::minutes(15)).unwrap();
        assert_matches!(other.verify(&token), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_garbage_is_invalid() {
        let codec = test_codec();
        assert_matches!(codec.verify("not-a-token"), Err(AuthError::TokenInvalid));
        assert_matches!(codec.verify(""), Err(AuthError::TokenInvalid));
        assert_matches!(codec.verify("!!!%%%"), Err(AuthError::TokenInvalid));
    }

    #[test]
    fn test_key_must_be_32_bytes() {
        assert_matches!(
            TokenCodec::new(&[0u8; 16]),
            Err(AuthError::KeyInvalid { len: 16 })
        );
        assert_matches!(
            TokenCodec::new(&[0u8; 33]),
            Err(AuthError::KeyInvalid { len: 33 })
        );
        assert!(TokenCodec::new(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_token_is_url_safe() {
        let codec = test_codec();
        let (token, _) = codec.create("alice", Duration::minutes(15)).unwrap();
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}

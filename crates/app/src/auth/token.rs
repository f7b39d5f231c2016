//! Session token hashing.

use sha2::{Digest, Sha256};
use thiserror::Error;

/// Shortest bearer token accepted before hashing.
pub const MIN_SESSION_TOKEN_LEN: usize = 16;

/// Longest bearer token accepted before hashing.
pub const MAX_SESSION_TOKEN_LEN: usize = 512;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionTokenError {
    #[error("session token has an invalid length")]
    InvalidLength,

    #[error("session token contains invalid characters")]
    InvalidCharacters,
}

/// Hash a bearer token into the form stored in `sessions.token_hash`.
///
/// Tokens are opaque to this service; only their SHA-256 digest is persisted.
///
/// # Errors
///
/// Returns an error when the token is empty, oversized or contains non-visible characters.
pub fn hash_session_token(token: &str) -> Result<String, SessionTokenError> {
    if !(MIN_SESSION_TOKEN_LEN..=MAX_SESSION_TOKEN_LEN).contains(&token.len()) {
        return Err(SessionTokenError::InvalidLength);
    }

    if !token.bytes().all(|b| b.is_ascii_graphic()) {
        return Err(SessionTokenError::InvalidCharacters);
    }

    Ok(hex::encode(Sha256::digest(token.as_bytes())))
}

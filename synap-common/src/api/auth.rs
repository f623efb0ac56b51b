//! Credential hashing for the admin gateway
//!
//! # Architecture
//!
//! - Passwords are stored as Argon2id PHC strings (salt embedded)
//! - Session tokens are 32 random bytes rendered as 64 hex characters
//! - Only the SHA-256 of a session token is persisted; the raw token lives
//!   in the client cookie
//!
//! # Pure Functions
//!
//! This module contains ONLY pure functions. Session persistence lives in
//! the service crate.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;

// ========================================
// Error Types
// ========================================

/// Credential error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialError {
    /// Password was empty
    EmptyPassword,

    /// Stored hash is not a valid PHC string
    MalformedHash(String),

    /// Hashing backend failure
    HashFailure(String),
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CredentialError::EmptyPassword => write!(f, "Password must not be empty"),
            CredentialError::MalformedHash(err) => write!(f, "Malformed password hash: {}", err),
            CredentialError::HashFailure(err) => write!(f, "Password hashing failed: {}", err),
        }
    }
}

impl std::error::Error for CredentialError {}

// ========================================
// Password Hashing
// ========================================

/// Hash a password with Argon2id and a fresh random salt
///
/// # Examples
///
/// ```
/// use synap_common::api::auth::{hash_password, verify_password};
///
/// let phc = hash_password("correct horse").unwrap();
/// assert!(phc.starts_with("$argon2id$"));
/// assert!(verify_password("correct horse", &phc).unwrap());
/// ```
pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    if password.is_empty() {
        return Err(CredentialError::EmptyPassword);
    }

    let salt = SaltString::generate(&mut rand::rngs::OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| CredentialError::HashFailure(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// Returns `Ok(false)` for a wrong password and `Err` only when the stored
/// hash itself cannot be parsed.
pub fn verify_password(password: &str, phc: &str) -> Result<bool, CredentialError> {
    let parsed =
        PasswordHash::new(phc).map_err(|e| CredentialError::MalformedHash(e.to_string()))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Spend one Argon2 verification on a throwaway hash and return `false`
///
/// Sign-in calls this for unknown emails so they cost the same as a wrong
/// password. The throwaway hash is built on first use.
pub fn verify_dummy_password(password: &str) -> bool {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("synap unknown account").ok());
    if let Some(phc) = dummy {
        let _ = verify_password(password, phc);
    }
    false
}

// ========================================
// Session Tokens
// ========================================

/// Generate a new opaque session token (64 hex chars)
pub fn generate_session_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    to_hex(&bytes)
}

/// Hash a session token for storage
///
/// # Examples
///
/// ```
/// use synap_common::api::auth::hash_session_token;
///
/// let hash = hash_session_token("abc");
/// assert_eq!(hash.len(), 64);
/// assert_eq!(hash, hash_session_token("abc"));
/// ```
pub fn hash_session_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

// ========================================
// Tests
// ========================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_round_trip() {
        let phc = hash_password("hunter2").unwrap();
        assert!(verify_password("hunter2", &phc).unwrap());
        assert!(!verify_password("hunter3", &phc).unwrap());
    }

    #[test]
    fn test_dummy_verification_always_fails() {
        assert!(!verify_dummy_password("anything"));
        assert!(!verify_dummy_password("synap unknown account"));
        assert!(!verify_dummy_password(""));
    }

    #[test]
    fn test_password_salts_differ() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_password_rejected() {
        assert_eq!(hash_password(""), Err(CredentialError::EmptyPassword));
    }

    #[test]
    fn test_malformed_hash_is_error() {
        assert!(matches!(
            verify_password("x", "not-a-phc-string"),
            Err(CredentialError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_session_token_format() {
        let token = generate_session_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_session_token());
    }

    #[test]
    fn test_session_token_hash_is_not_token() {
        let token = generate_session_token();
        let hash = hash_session_token(&token);
        assert_eq!(hash.len(), 64);
        assert_ne!(hash, token);
    }
}

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{DateTime, Duration, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use thiserror::Error;

use crate::models::validate_password;

/// Lifetime of a password-reset link.
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;
const RESET_TOKEN_LEN: usize = 43;

#[derive(Error, Debug)]
pub enum PasswordError {
    #[error("{0}")]
    Policy(String),
    #[error("Failed to hash password")]
    HashingFailed,
    #[error("Failed to verify password")]
    VerificationFailed,
}

/// Hash a password using bcrypt after checking the length policy
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password).map_err(|e| PasswordError::Policy(e.to_string()))?;

    hash(password, DEFAULT_COST).map_err(|_| PasswordError::HashingFailed)
}

/// Verify a password against its hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    verify(password, hash).map_err(|_| PasswordError::VerificationFailed)
}

/// URL-safe random reset token and its expiry.
pub fn generate_reset_token(now: DateTime<Utc>) -> (String, DateTime<Utc>) {
    let token: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RESET_TOKEN_LEN)
        .map(char::from)
        .collect();

    (token, now + Duration::hours(RESET_TOKEN_TTL_HOURS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = hash_password("squat-day").unwrap();
        assert!(verify_password("squat-day", &hashed).unwrap());
        assert!(!verify_password("leg-day", &hashed).unwrap());
    }

    #[test]
    fn test_short_password_is_rejected_before_hashing() {
        assert!(matches!(hash_password("abc"), Err(PasswordError::Policy(_))));
    }

    #[test]
    fn test_reset_token_shape() {
        let now = Utc::now();
        let (token, expires) = generate_reset_token(now);
        let (other, _) = generate_reset_token(now);

        assert_eq!(token.len(), RESET_TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, other);
        assert_eq!(expires - now, Duration::hours(1));
    }
}

//! One-time secrets: 6-digit email codes and password reset tokens.

use chrono::{DateTime, Duration, Utc};
use rand::{Rng, RngCore};
use sha2::{Digest, Sha256};

/// Lifetime of an email verification / password change code.
pub const VERIFICATION_CODE_TTL_MINUTES: i64 = 10;
/// Lifetime of a password reset token.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 60;

/// A random code in `100000..=999999`.
pub fn generate_verification_code() -> String {
    rand::thread_rng().gen_range(100_000..1_000_000).to_string()
}

pub fn verification_code_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(VERIFICATION_CODE_TTL_MINUTES)
}

pub fn reset_token_expiry(now: DateTime<Utc>) -> DateTime<Utc> {
    now + Duration::minutes(RESET_TOKEN_TTL_MINUTES)
}

/// A fresh reset token. The raw token goes to the user; only its hash is stored.
pub struct ResetToken {
    pub raw: String,
    pub hash: String,
}

pub fn generate_reset_token() -> ResetToken {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hash = hash_reset_token(&raw);
    ResetToken { raw, hash }
}

pub fn hash_reset_token(raw: &str) -> String {
    hex::encode(Sha256::digest(raw.as_bytes()))
}

/// True when `candidate` equals the stored code and the code has not expired.
pub fn code_matches(
    stored: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
    candidate: &str,
    now: DateTime<Utc>,
) -> bool {
    match (stored, expires_at) {
        (Some(code), Some(expiry)) => code == candidate.trim() && expiry > now,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_code_shape() {
        for _ in 0..100 {
            let code = generate_verification_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
            assert!(!code.starts_with('0'));
        }
    }

    #[test]
    fn test_reset_token_hash_roundtrip() {
        let token = generate_reset_token();
        assert_eq!(token.raw.len(), 64);
        assert_eq!(token.hash, hash_reset_token(&token.raw));
        assert_ne!(token.hash, token.raw);
    }

    #[test]
    fn test_code_matches_respects_expiry() {
        let now = Utc::now();
        let expiry = verification_code_expiry(now);
        assert!(code_matches(Some("123456"), Some(expiry), "123456", now));
        assert!(code_matches(Some("123456"), Some(expiry), " 123456 ", now));
        assert!(!code_matches(Some("123456"), Some(expiry), "654321", now));
        assert!(!code_matches(
            Some("123456"),
            Some(expiry),
            "123456",
            expiry + Duration::seconds(1)
        ));
        assert!(!code_matches(None, None, "123456", now));
    }
}

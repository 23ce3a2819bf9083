//! Password-reset tokens.
//!
//! The raw token is mailed to the user; only its SHA-256 digest is stored.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 20;

/// How long an emailed reset link stays usable.
pub const RESET_TOKEN_TTL_MINUTES: i64 = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetToken {
    /// Hex token for the reset link. Never persisted.
    pub token: String,
    /// Hex SHA-256 of `token`, stored on the user.
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    pub fn generate(now: DateTime<Utc>) -> Self {
        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);
        let token = hex::encode(bytes);
        let digest = digest_reset_token(&token);
        Self {
            token,
            digest,
            expires_at: now + Duration::minutes(RESET_TOKEN_TTL_MINUTES),
        }
    }
}

pub fn digest_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_matches_generated_token() {
        let now = Utc::now();
        let reset = ResetToken::generate(now);
        assert_eq!(reset.token.len(), TOKEN_BYTES * 2);
        assert_eq!(digest_reset_token(&reset.token), reset.digest);
        assert_ne!(reset.token, reset.digest);
        assert_eq!(reset.expires_at - now, Duration::minutes(15));
    }

    #[test]
    fn tokens_are_random() {
        let now = Utc::now();
        assert_ne!(ResetToken::generate(now).token, ResetToken::generate(now).token);
    }

    #[test]
    fn digest_is_sha256_hex() {
        assert_eq!(
            digest_reset_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}

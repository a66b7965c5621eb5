//! Signed, time-limited bearer tokens.
//!
//! Tokens are HS256 JWTs carrying the user id in `sub` plus `iat`/`exp`.
//! Verification is stateless: there is no revocation list, so a token stays
//! valid until `exp` even if the user's password changes in the meantime.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: i64,
    exp: i64,
}

/// Why a token was not accepted. Never fatal for the request on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token signature does not match")]
    BadSignature,

    #[error("token is malformed")]
    Malformed,

    #[error("token has expired")]
    Expired,
}

#[derive(Debug, Error)]
#[error("Failed to sign token: {0}")]
pub struct TokenIssueError(#[from] jsonwebtoken::errors::Error);

pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    default_ttl_seconds: i64,
}

impl TokenCodec {
    /// Builds a codec around a process-wide secret. The secret is fixed for
    /// the codec's lifetime; a different secret rejects every earlier token.
    #[must_use]
    pub fn new(secret: &[u8], default_ttl_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked by hand so that a token is already invalid at
        // exactly `exp`, with no leeway.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            default_ttl_seconds: i64::try_from(default_ttl_seconds).unwrap_or(i64::MAX),
        }
    }

    #[must_use]
    pub const fn default_ttl_seconds(&self) -> i64 {
        self.default_ttl_seconds
    }

    /// Issue a token for `user_id` using the configured validity window.
    pub fn issue(&self, user_id: i32) -> Result<String, TokenIssueError> {
        self.issue_with_ttl(user_id, self.default_ttl_seconds)
    }

    pub fn issue_with_ttl(
        &self,
        user_id: i32,
        ttl_seconds: i64,
    ) -> Result<String, TokenIssueError> {
        self.issue_at(user_id, ttl_seconds, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(
        &self,
        user_id: i32,
        ttl_seconds: i64,
        issued_at: i64,
    ) -> Result<String, TokenIssueError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at,
            exp: issued_at.saturating_add(ttl_seconds),
        };

        Ok(jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &self.encoding,
        )?)
    }

    /// Returns the user id carried by a valid token.
    pub fn verify(&self, token: &str) -> Result<i32, TokenRejection> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    pub fn verify_at(&self, token: &str, now: i64) -> Result<i32, TokenRejection> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::InvalidSignature => TokenRejection::BadSignature,
                _ => TokenRejection::Malformed,
            })?;

        if now >= data.claims.exp {
            return Err(TokenRejection::Expired);
        }

        data.claims
            .sub
            .parse::<i32>()
            .map_err(|_| TokenRejection::Malformed)
    }
}

/// Generate a random 256-bit signing secret (64 character hex string)
#[must_use]
pub fn generate_secret() -> String {
    use rand::Rng;

    let mut rng = rand::rng();
    let bytes: [u8; 32] = rng.random();

    bytes.iter().fold(String::with_capacity(64), |mut acc, b| {
        use std::fmt::Write;
        let _ = write!(acc, "{b:02x}");
        acc
    })
}

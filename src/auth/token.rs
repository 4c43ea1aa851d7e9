use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;

/// Claims carried by a session token. `sub` identifies the principal;
/// `name` and `email` ride along for display so session reads skip a
/// database lookup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub name: String,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Single answer for every verification failure - bad signature,
    /// malformed token, expired window. Callers learn nothing more.
    #[error("session token is invalid or expired")]
    Invalid,

    #[error("token signing failed: {0}")]
    Signing(String),
}

/// Signs and verifies session tokens. Pure function of the signing secret
/// and its input; one instance serves the whole process.
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    pub fn from_config() -> Self {
        let security = &config::config().security;
        Self::new(&security.jwt_secret, security.token_ttl_minutes)
    }

    pub fn ttl_seconds(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a token for the principal, valid for the fixed session window
    /// starting now.
    pub fn issue(&self, principal: Uuid, name: &str, email: &str) -> Result<String, TokenError> {
        self.issue_at(principal, name, email, Utc::now())
    }

    fn issue_at(
        &self,
        principal: Uuid,
        name: &str,
        email: &str,
        issued: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = Claims {
            sub: principal,
            name: name.to_string(),
            email: email.to_string(),
            iat: issued.timestamp(),
            exp: (issued + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Verify a presented token and return its claims. Never panics on
    /// hostile input; every failure collapses to `TokenError::Invalid`.
    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        let mut validation = Validation::default();
        // Default validation tolerates 60s of clock drift, which would blur
        // the end of the session window. Expiry here is exact.
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::Invalid)
    }
}

// Process-wide codec, keyed once from config like CONFIG itself.
pub static CODEC: Lazy<TokenCodec> = Lazy::new(TokenCodec::from_config);

pub fn codec() -> &'static TokenCodec {
    &CODEC
}

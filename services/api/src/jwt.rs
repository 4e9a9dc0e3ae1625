//! Token service for the access/refresh credential pair
//!
//! Issues and verifies the two independently keyed JWTs carried as cookies.
//! The access token is short-lived; the refresh token is longer-lived and is
//! used solely to mint a new pair. Both embed the same identity claim shape.
//! Verification failure is a normal outcome, not an error condition.

use anyhow::Result;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// Token configuration
#[derive(Debug, Clone)]
pub struct TokenConfig {
    /// Secret used to sign and verify access tokens
    pub access_secret: String,
    /// Secret used to sign and verify refresh tokens
    pub refresh_secret: String,
    /// Access token expiration time in seconds (default: 15 minutes)
    pub access_expiry: u64,
    /// Refresh token expiration time in seconds (default: 7 days)
    pub refresh_expiry: u64,
}

impl TokenConfig {
    /// Create a new TokenConfig from environment variables
    ///
    /// # Environment Variables
    /// - `JWT_ACCESS_SECRET`: access token signing secret
    /// - `JWT_REFRESH_SECRET`: refresh token signing secret
    /// - `JWT_ACCESS_TOKEN_EXPIRY`: access token expiry in seconds (default: 900)
    /// - `JWT_REFRESH_TOKEN_EXPIRY`: refresh token expiry in seconds (default: 604800)
    pub fn from_env() -> Result<Self> {
        let access_secret = std::env::var("JWT_ACCESS_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_ACCESS_SECRET environment variable not set"))?;

        let refresh_secret = std::env::var("JWT_REFRESH_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_REFRESH_SECRET environment variable not set"))?;

        let access_expiry = std::env::var("JWT_ACCESS_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(900);

        let refresh_expiry = std::env::var("JWT_REFRESH_TOKEN_EXPIRY")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(604_800);

        Ok(TokenConfig {
            access_secret,
            refresh_secret,
            access_expiry,
            refresh_expiry,
        })
    }
}

/// Identity claim carried by both tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Telegram user id
    pub sub: i64,
    /// Cached admin flag, re-derived at sign-in and refresh
    pub is_admin: bool,
    /// Issued at time (unix seconds)
    pub iat: u64,
    /// Expiration time (unix seconds)
    pub exp: u64,
}

/// Which credential of the pair a token claims to be
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A freshly minted token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Token service holding the two signing secrets as explicit configuration
#[derive(Clone)]
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    validation: Validation,
    access_expiry: u64,
    refresh_expiry: u64,
}

impl TokenService {
    /// Initialize a new token service
    pub fn new(config: &TokenConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;

        TokenService {
            access_encoding: EncodingKey::from_secret(config.access_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_secret.as_bytes()),
            validation,
            access_expiry: config.access_expiry,
            refresh_expiry: config.refresh_expiry,
        }
    }

    /// Issue a new access/refresh pair for a user
    pub fn issue_pair(&self, user_id: i64, is_admin: bool) -> Result<TokenPair> {
        let now = unix_now()?;

        let access_claims = Claims {
            sub: user_id,
            is_admin,
            iat: now,
            exp: now + self.access_expiry,
        };
        let refresh_claims = Claims {
            sub: user_id,
            is_admin,
            iat: now,
            exp: now + self.refresh_expiry,
        };

        let access_token = encode(&Header::default(), &access_claims, &self.access_encoding)?;
        let refresh_token = encode(&Header::default(), &refresh_claims, &self.refresh_encoding)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Verify a token against the secret for `kind` and return its claims.
    ///
    /// Returns `None` for an invalid signature, a malformed claim, a token
    /// signed for the other kind, or an expired token. A token is accepted up
    /// to and including its expiry second.
    pub fn verify(&self, token: &str, kind: TokenKind) -> Option<Claims> {
        let key = match kind {
            TokenKind::Access => &self.access_decoding,
            TokenKind::Refresh => &self.refresh_decoding,
        };

        decode::<Claims>(token, key, &self.validation)
            .ok()
            .map(|data| data.claims)
    }

    /// Get the access token expiry time in seconds
    pub fn access_expiry(&self) -> u64 {
        self.access_expiry
    }

    /// Get the refresh token expiry time in seconds
    pub fn refresh_expiry(&self) -> u64 {
        self.refresh_expiry
    }
}

fn unix_now() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| anyhow::anyhow!("Failed to get current time: {}", e))?
        .as_secs())
}

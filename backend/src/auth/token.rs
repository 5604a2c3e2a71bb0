//! Session token issuance and validation
//!
//! Tokens are HS256 JWTs carrying the administrator id, username and
//! expiry. They are never persisted; expiry is the only invalidation.

use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use link_catalog_shared::AuthError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Token claims
///
/// Decoding fails closed: a missing or non-numeric `id` rejects the token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Administrator id
    pub id: i64,
    #[serde(default)]
    pub username: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

/// Authenticated administrator reconstructed from token claims
///
/// Not re-read from the store, so it can lag behind the admins table
/// until the next login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: i64,
    pub username: String,
}

/// Pre-computed signing keys, created once from the process secret
#[derive(Clone)]
struct TokenKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
}

impl TokenKeys {
    fn new(secret: &str) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }
}

/// Token service for issuing and validating session tokens
#[derive(Clone)]
pub struct TokenService {
    keys: TokenKeys,
    validation: Arc<Validation>,
    ttl_secs: i64,
}

impl TokenService {
    /// Create a token service from the server secret
    ///
    /// Call once at startup and share through `AppState`.
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            keys: TokenKeys::new(secret),
            validation: Arc::new(validation),
            ttl_secs,
        }
    }

    /// Issue a token for `principal` that expires after the configured TTL
    pub fn issue(&self, principal: &Principal) -> Result<String> {
        self.issue_expiring_at(principal, Utc::now() + Duration::seconds(self.ttl_secs))
    }

    fn issue_expiring_at(&self, principal: &Principal, expires_at: DateTime<Utc>) -> Result<String> {
        let claims = Claims {
            id: principal.id,
            username: principal.username.clone(),
            exp: expires_at.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.keys.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to generate token: {}", e))
    }

    /// Verify signature and expiry and return the principal
    pub fn validate(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<Claims>(token, &self.keys.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::InvalidToken("Token has expired".to_string()),
                _ => AuthError::invalid_token(),
            }
        })?;

        Ok(Principal {
            id: data.claims.id,
            username: data.claims.username,
        })
    }

    /// Token lifetime in seconds
    #[inline]
    pub fn ttl_secs(&self) -> i64 {
        self.ttl_secs
    }
}

//! Error types for the Link Catalog application

use thiserror::Error;

/// Authentication failures
///
/// The display strings are what callers see in the `message` field, so
/// they stay short and stable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization format")]
    MalformedHeader,

    #[error("{0}")]
    InvalidToken(String),

    #[error("Invalid credentials")]
    InvalidCredentials,
}

impl AuthError {
    /// Token rejected by signature, expiry or claim checks
    pub fn invalid_token() -> Self {
        AuthError::InvalidToken("Invalid token".to_string())
    }
}

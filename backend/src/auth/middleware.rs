//! Authentication middleware
//!
//! The gate runs before every admin route: it reads the bearer token,
//! validates it with the pre-computed `TokenService` from `AppState`, and
//! stores the resulting `Principal` in the request extensions. A rejected
//! request never reaches its handler.

use super::token::{Principal, TokenService};
use crate::error::ApiError;
use crate::state::AppState;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use link_catalog_shared::AuthError;
use tracing::warn;

/// Extract the token from an `Authorization: Bearer <token>` header
///
/// The header must split on single spaces into exactly two parts, the
/// first being `Bearer`.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Ok(token),
        _ => Err(AuthError::MalformedHeader),
    }
}

/// Run the whole gate against a set of request headers
pub fn authenticate(headers: &HeaderMap, tokens: &TokenService) -> Result<Principal, AuthError> {
    let token = bearer_token(headers)?;
    tokens.validate(token)
}

/// Middleware that admits only requests carrying a valid token
pub async fn require_admin(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let principal = authenticate(request.headers(), state.tokens()).map_err(|e| {
        warn!(path = %request.uri().path(), reason = %e, "Rejected unauthenticated request");
        ApiError::from(e)
    })?;

    request.extensions_mut().insert(principal);

    Ok(next.run(request).await)
}

/// Authenticated administrator for handlers
///
/// Reuses the principal bound by `require_admin` when present and runs
/// the gate itself otherwise.
#[derive(Debug, Clone)]
pub struct AuthAdmin(pub Principal);

#[async_trait]
impl<S> FromRequestParts<S> for AuthAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(principal) = parts.extensions.get::<Principal>() {
            return Ok(AuthAdmin(principal.clone()));
        }

        let app_state = AppState::from_ref(state);
        let principal = authenticate(&parts.headers, app_state.tokens())?;
        Ok(AuthAdmin(principal))
    }
}

//! Device-class request policy
//!
//! When enabled, public routes only accept requests from phones and
//! tablets as identified by their User-Agent.

use crate::error::ApiError;
use axum::{extract::Request, http::header::USER_AGENT, middleware::Next, response::Response};
use link_catalog_shared::validation::is_mobile_user_agent;
use tracing::debug;

/// Middleware rejecting non-mobile clients with 403
pub async fn mobile_only(request: Request, next: Next) -> Result<Response, ApiError> {
    let user_agent = request
        .headers()
        .get(USER_AGENT)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !is_mobile_user_agent(user_agent) {
        debug!(user_agent, "Rejected non-mobile client");
        return Err(ApiError::Forbidden(
            "Access is only allowed from mobile devices (Android/iOS)".to_string(),
        ));
    }

    Ok(next.run(request).await)
}

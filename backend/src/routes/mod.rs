//! Route definitions for the link catalog API
//!
//! This module organizes all API routes and applies middleware.

use crate::auth::{mobile_only, require_admin};
use crate::state::AppState;
use axum::{
    http::{header, HeaderValue, Method},
    middleware,
    routing::get,
    Router,
};
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

mod auth;
mod categories;
mod health;
mod links;

#[cfg(test)]
mod catalog_tests;

/// Create the main application router with all middleware
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config().cors.allowed_origins);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
        .route("/health/live", get(health::liveness_check))
        .nest("/api", api_routes(state.clone()))
        // Apply middleware layers
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(30)))
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API routes, split by the gate they sit behind
fn api_routes(state: AppState) -> Router<AppState> {
    let mut public = Router::new()
        .merge(auth::public_auth_routes())
        .merge(categories::public_category_routes());

    if state.config().security.mobile_only {
        public = public.route_layer(middleware::from_fn(mobile_only));
    }

    let admin = Router::new()
        .merge(auth::admin_auth_routes())
        .merge(categories::admin_category_routes())
        .merge(links::admin_link_routes())
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    public.merge(admin)
}

/// CORS policy from the configured origin list; `*` allows any origin
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .expose_headers([header::AUTHORIZATION, header::CONTENT_LENGTH]);

    // Credentials cannot be combined with a wildcard origin
    if allowed_origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> = allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins)).allow_credentials(true)
    }
}

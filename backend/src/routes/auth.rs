//! Authentication routes
//!
//! Login is public. Changing the password and logging out sit behind the
//! bearer-token gate applied in `create_router`.

use crate::auth::AuthAdmin;
use crate::error::{ApiError, ApiResult};
use crate::extract::AppJson;
use crate::services::AuthService;
use crate::state::AppState;
use axum::{
    extract::State,
    routing::{patch, post},
    Json, Router,
};
use link_catalog_shared::{ChangePasswordRequest, LoginRequest, MessageResponse, TokenResponse};
use validator::Validate;

/// Public auth routes
pub fn public_auth_routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}

/// Auth routes requiring a session
pub fn admin_auth_routes() -> Router<AppState> {
    Router::new()
        .route("/change-password", patch(change_password))
        .route("/logout", post(logout))
}

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    AppJson(req): AppJson<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    req.validate()
        .map_err(|_| ApiError::Validation("Username and password are required".to_string()))?;

    let response = AuthService::login(
        state.admins(),
        state.credentials(),
        state.tokens(),
        &req.username,
        &req.password,
    )
    .await?;

    Ok(Json(response))
}

/// PATCH /api/change-password
async fn change_password(
    State(state): State<AppState>,
    AuthAdmin(admin): AuthAdmin,
    AppJson(req): AppJson<ChangePasswordRequest>,
) -> ApiResult<Json<MessageResponse>> {
    req.validate()?;

    AuthService::change_password(
        state.admins(),
        state.credentials(),
        admin.id,
        &req.current_password,
        &req.new_password,
    )
    .await?;

    Ok(Json(MessageResponse::new("Password changed successfully")))
}

/// POST /api/logout
///
/// Tokens are stateless; the client discards its copy.
async fn logout(AuthAdmin(admin): AuthAdmin) -> Json<MessageResponse> {
    tracing::info!(admin_id = admin.id, "Admin logged out");
    Json(MessageResponse::new("Logout successful"))
}

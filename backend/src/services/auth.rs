//! Auth service for administrator sessions
//!
//! Password hashing and verification go through `CredentialVerifier`,
//! which runs the work on the blocking thread pool.

use crate::auth::{CredentialVerifier, Principal, TokenService};
use crate::config::AdminSeedConfig;
use crate::error::ApiError;
use crate::repositories::AdminStore;
use link_catalog_shared::{AuthError, TokenResponse};
use tracing::{info, warn};

/// Minimum length of a new administrator password
pub const MIN_PASSWORD_LEN: usize = 6;

/// Auth service for login and credential management
pub struct AuthService;

impl AuthService {
    /// Exchange a username and password for a session token
    pub async fn login(
        admins: &dyn AdminStore,
        credentials: &dyn CredentialVerifier,
        tokens: &TokenService,
        username: &str,
        password: &str,
    ) -> Result<TokenResponse, ApiError> {
        let admin = admins
            .find_by_username(username)
            .await
            .map_err(ApiError::Internal)?
            .ok_or(AuthError::InvalidCredentials)?;

        // An unreadable stored hash is a failed login, not a server error
        let valid = credentials
            .verify(password.to_string(), admin.password_hash.clone())
            .await
            .unwrap_or_else(|e| {
                warn!(admin_id = admin.id, error = %e, "Stored password hash could not be verified");
                false
            });

        if !valid {
            warn!(username = %username, "Failed login attempt");
            return Err(AuthError::InvalidCredentials.into());
        }

        let token = tokens
            .issue(&Principal {
                id: admin.id,
                username: admin.username,
            })
            .map_err(ApiError::Internal)?;

        info!(admin_id = admin.id, "Admin logged in");
        Ok(TokenResponse { token })
    }

    /// Replace the password of `admin_id` after checking the current one
    pub async fn change_password(
        admins: &dyn AdminStore,
        credentials: &dyn CredentialVerifier,
        admin_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), ApiError> {
        if new_password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::Validation(format!(
                "New password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        let admin = admins
            .find_by_id(admin_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Validation("Admin not found".to_string()))?;

        let valid = credentials
            .verify(current_password.to_string(), admin.password_hash)
            .await
            .unwrap_or(false);
        if !valid {
            return Err(ApiError::Validation(
                "Current password is incorrect".to_string(),
            ));
        }

        let hash = credentials
            .hash(new_password.to_string())
            .await
            .map_err(ApiError::Internal)?;

        let updated = admins
            .update_password(admin_id, &hash)
            .await
            .map_err(ApiError::Internal)?;
        if !updated {
            return Err(ApiError::Validation("Admin not found".to_string()));
        }

        info!(admin_id, "Admin password changed");
        Ok(())
    }

    /// Create the default administrator when none exists.
    ///
    /// Returns true when an account was created.
    pub async fn ensure_default_admin(
        admins: &dyn AdminStore,
        credentials: &dyn CredentialVerifier,
        seed: &AdminSeedConfig,
    ) -> anyhow::Result<bool> {
        if !seed.seed_default || admins.count().await? > 0 {
            return Ok(false);
        }

        let hash = credentials.hash(seed.default_password.clone()).await?;
        let admin = admins.create(&seed.default_username, &hash).await?;

        info!(admin_id = admin.id, username = %admin.username, "Default admin created");
        Ok(true)
    }
}

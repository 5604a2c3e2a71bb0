//! API request and response types

use serde::{Deserialize, Serialize};
use validator::Validate;

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    pub code: String,
}

/// Plain message response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ============================================================================
// Authentication Types
// ============================================================================

/// Login request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response carrying the bearer token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub token: String,
}

/// Change password request
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    #[serde(default)]
    #[validate(length(min = 6, message = "New password must be at least 6 characters"))]
    pub new_password: String,
}

// ============================================================================
// Catalog Types
// ============================================================================

/// Create or replace a category
///
/// An absent, zero or negative `order` asks the server to append the
/// category after the current last one.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Create or replace a link inside the category named by the path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub price: i64,
    #[serde(default)]
    pub price_str: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    /// Defaults to active when omitted
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Query for the public catalog listing
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoriesWithLinksQuery {
    #[serde(rename = "includeEmpty", default)]
    pub include_empty: Option<String>,
}

impl CategoriesWithLinksQuery {
    /// Only the literal `true` includes empty categories
    pub fn include_empty(&self) -> bool {
        self.include_empty.as_deref() == Some("true")
    }
}

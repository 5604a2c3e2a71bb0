//! Data models for the Link Catalog application

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Administrator account
///
/// There is a single implicit admin role; every account can manage the
/// whole catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Admin {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    /// Display rank among all categories
    pub order: i32,
}

/// A single catalog link
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: i64,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub price: i64,
    /// Preformatted price label, e.g. "Rp 15.000"
    pub price_str: Option<String>,
    /// Display rank within the owning category
    pub order: i32,
    pub is_active: bool,
    pub category_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category with its active links, sorted by order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryWithLinks {
    #[serde(flatten)]
    pub category: Category,
    pub links: Vec<Link>,
}

/// Link with its owning category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkWithCategory {
    #[serde(flatten)]
    pub link: Link,
    pub category: Category,
}

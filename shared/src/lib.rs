//! Link Catalog Shared Library
//!
//! This crate contains the domain models, API request/response types and
//! validation rules shared by the backend and its clients.

pub mod errors;
pub mod models;
pub mod types;
pub mod validation;

// Re-export commonly used items
pub use errors::*;
pub use models::{Admin, Category, CategoryWithLinks, Link, LinkWithCategory};
pub use types::*;

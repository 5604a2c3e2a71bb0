//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! the stores, the ordering rules and the auth primitives.

pub mod auth;
pub mod catalog;

pub use auth::AuthService;
pub use catalog::{CatalogService, CategoryInput, LinkInput};

//! Database repositories
//!
//! Provides the data access layer. Each store is a trait with a
//! PostgreSQL implementation; `MemoryStore` implements all of them
//! without a database.

pub mod admin;
pub mod catalog;
pub mod memory;

pub use admin::{AdminStore, PgAdminStore};
pub use catalog::{CatalogStore, LinkChanges, NewCategory, NewLink, PgCatalogStore};
pub use memory::MemoryStore;

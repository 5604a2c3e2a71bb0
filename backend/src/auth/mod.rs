//! Authentication module
//!
//! Provides JWT session tokens, the bearer-token gate for admin routes
//! and password hashing.

mod device;
mod middleware;
mod password;
mod token;

pub use device::mobile_only;
pub use middleware::{authenticate, bearer_token, require_admin, AuthAdmin};
pub use password::{CredentialVerifier, PasswordService};
pub use token::{Claims, Principal, TokenService};

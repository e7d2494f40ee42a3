//! # vault-server
//!
//! HTTP API for Paykey Vault: account registration and login, plus the
//! authenticated endpoints that read, replace and clear a user's payment
//! provider credentials.

pub mod error;
pub mod extract;
mod routes;
mod server;

pub use error::ApiError;
pub use extract::AuthUser;
pub use routes::router;
pub use server::VaultServer;

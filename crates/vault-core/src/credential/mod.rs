//! Payment provider credentials: encrypted storage, validation and previews

mod types;
mod vault;

pub use types::*;
pub use vault::CredentialVault;

//! # vault-core
//!
//! Core of Paykey Vault, a per-user store for payment provider credentials:
//! - AES-256-GCM encryption of access tokens with a fresh 16-byte IV per write
//! - Masked previews, so stored secrets are never handed back in full
//! - Argon2id password hashing and HS256 session tokens
//! - Pluggable user storage (in-memory or JSON file)

pub mod account;
pub mod credential;
pub mod crypto;
pub mod error;
pub mod session;
pub mod settings;
pub mod storage;
mod services;

pub use account::{AccountService, AuthSession, LoginRequest, RegisterRequest, UserProfile};
pub use credential::{CredentialRules, CredentialState, CredentialStatus, CredentialUpdate, CredentialVault};
pub use crypto::{Cipher, CipherKey, Envelope, HashParams, PasswordHasher, SecretString};
pub use error::{AuthError, Result, VaultError};
pub use services::VaultServices;
pub use session::{Claims, Clock, ManualClock, SystemClock, TokenIssuer};
pub use settings::Settings;
pub use storage::{CredentialFields, JsonFileUserStore, MemoryUserStore, User, UserStore};

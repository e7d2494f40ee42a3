//! Error types for vault-core

use thiserror::Error;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Session token failures
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid session token")]
    Invalid,

    #[error("Session expired - please log in again")]
    Expired,
}

/// Vault error types
#[derive(Error, Debug)]
pub enum VaultError {
    #[error("{0}")]
    Validation(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Email already registered")]
    EmailTaken,

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Crypto error: {0}")]
    CryptoError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl VaultError {
    /// Whether the failure was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UserNotFound(_)
                | Self::EmailTaken
                | Self::InvalidCredentials
                | Self::Auth(_)
        )
    }

    /// Message that is safe to hand back to a client.
    ///
    /// Crypto and storage details stay server-side.
    pub fn public_message(&self) -> String {
        match self {
            Self::UserNotFound(_) => "User not found".to_string(),
            Self::CryptoError(_)
            | Self::StorageError(_)
            | Self::ConfigError(_)
            | Self::IoError(_)
            | Self::SerializationError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }
}

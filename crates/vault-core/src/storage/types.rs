//! Stored record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A user account as persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier, never reused
    pub id: String,

    /// Lowercased, unique
    pub email: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// Display name
    pub name: String,

    /// Encrypted provider access token (iv:ciphertext format)
    pub access_token: Option<String>,

    /// Provider public key, stored in clear
    pub public_key: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a user with no provider credentials
    pub fn new(id: String, email: String, password_hash: String, name: String) -> Self {
        let now = Utc::now();
        Self {
            id,
            email,
            password_hash,
            name,
            access_token: None,
            public_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Stored envelope, treating an empty column as absent
    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|s| !s.is_empty())
    }

    /// Stored public key, treating an empty column as absent
    pub fn public_key(&self) -> Option<&str> {
        self.public_key.as_deref().filter(|s| !s.is_empty())
    }

    pub(crate) fn apply(&mut self, fields: CredentialFields, updated_at: DateTime<Utc>) {
        self.access_token = fields.access_token;
        self.public_key = fields.public_key;
        self.updated_at = updated_at;
    }
}

/// New values for a user's credential columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialFields {
    /// Envelope of the encrypted access token
    pub access_token: Option<String>,
    pub public_key: Option<String>,
}

impl CredentialFields {
    /// Both columns cleared
    pub fn cleared() -> Self {
        Self::default()
    }
}

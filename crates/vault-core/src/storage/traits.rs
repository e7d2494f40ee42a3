//! Storage trait definitions

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{CredentialFields, User};
use crate::error::Result;

/// Trait for user record backends
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a new user, failing with `EmailTaken` if the email is in use
    async fn insert(&self, user: User) -> Result<()>;

    /// Look up a user by id
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;

    /// Look up a user by (already lowercased) email
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Overwrite both credential fields and `updated_at` in one step.
    ///
    /// Returns `false` when no user has the given id.
    async fn update_credentials(
        &self,
        id: &str,
        fields: CredentialFields,
        updated_at: DateTime<Utc>,
    ) -> Result<bool>;

    /// Get a human-readable name for this storage backend
    fn backend_name(&self) -> &'static str;
}

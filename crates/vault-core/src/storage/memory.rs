//! In-memory storage backend

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{CredentialFields, User};
use super::UserStore;
use crate::error::{Result, VaultError};

/// User store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(VaultError::EmailTaken);
        }
        if users.contains_key(&user.id) {
            return Err(VaultError::StorageError(format!("Duplicate user id: {}", user.id)));
        }

        debug!("Inserted user: {}", user.id);
        users.insert(user.id.clone(), user);
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn update_credentials(
        &self,
        id: &str,
        fields: CredentialFields,
        updated_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut users = self.users.write().await;

        match users.get_mut(id) {
            Some(user) => {
                user.apply(fields, updated_at);
                debug!("Updated credentials for user: {}", id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn backend_name(&self) -> &'static str {
        "In-Memory Storage"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User::new(id.to_string(), email.to_string(), "hash".to_string(), "Test".to_string())
    }

    #[tokio::test]
    async fn test_insert_and_find() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "a@example.com")).await.unwrap();

        assert_eq!(store.find_by_id("u1").await.unwrap().unwrap().email, "a@example.com");
        assert_eq!(store.find_by_email("a@example.com").await.unwrap().unwrap().id, "u1");
        assert!(store.find_by_id("u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "a@example.com")).await.unwrap();

        let result = store.insert(user("u2", "a@example.com")).await;
        assert!(matches!(result, Err(VaultError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_update_credentials() {
        let store = MemoryUserStore::new();
        store.insert(user("u1", "a@example.com")).await.unwrap();

        let fields = CredentialFields {
            access_token: Some("00:11".to_string()),
            public_key: Some("TEST-1".to_string()),
        };
        let now = Utc::now();
        assert!(store.update_credentials("u1", fields.clone(), now).await.unwrap());

        let stored = store.find_by_id("u1").await.unwrap().unwrap();
        assert_eq!(stored.public_key.as_deref(), Some("TEST-1"));
        assert_eq!(stored.updated_at, now);

        assert!(!store.update_credentials("missing", fields, now).await.unwrap());
    }
}

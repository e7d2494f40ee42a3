//! Credential vault: read, write and clear a user's provider credentials

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use super::types::{mask_tail, public_key_preview, CredentialRules, CredentialStatus, CredentialUpdate};
use crate::crypto::Cipher;
use crate::error::{Result, VaultError};
use crate::storage::{CredentialFields, UserStore};

/// Owns the read/write/clear operations over users' encrypted credentials
pub struct CredentialVault {
    /// Storage backend
    store: Arc<dyn UserStore>,
    /// Cipher for the stored access token
    cipher: Arc<Cipher>,
    /// Acceptance rules for new credentials
    rules: CredentialRules,
}

impl CredentialVault {
    /// Create a new credential vault
    pub fn new(store: Arc<dyn UserStore>, cipher: Arc<Cipher>, rules: CredentialRules) -> Self {
        Self {
            store,
            cipher,
            rules,
        }
    }

    /// Report whether credentials are configured, with masked previews
    pub async fn get_status(&self, user_id: &str) -> Result<CredentialStatus> {
        let user = self
            .store
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| VaultError::UserNotFound(user_id.to_string()))?;

        let envelope = user.access_token();
        let public_key = user.public_key();
        let has_credentials = envelope.is_some() && public_key.is_some();

        let public_key_preview = public_key.map(public_key_preview).unwrap_or_default();

        let access_token_preview = match envelope {
            Some(envelope) => match self.cipher.decrypt(envelope) {
                // The plaintext is zeroed when `secret` drops at the end of this arm
                Some(secret) => mask_tail(secret.expose()),
                None => {
                    warn!("Stored access token for user {} could not be decrypted", user_id);
                    String::new()
                }
            },
            None => String::new(),
        };

        let message = if has_credentials {
            "Credentials configured"
        } else {
            "Credentials not configured"
        };

        Ok(CredentialStatus {
            has_credentials,
            access_token_preview,
            public_key_preview,
            message: message.to_string(),
        })
    }

    /// Validate, encrypt and store a new credential pair
    pub async fn set_credentials(&self, user_id: &str, update: &CredentialUpdate) -> Result<()> {
        if let Err(e) = self.rules.validate(update) {
            debug!("Rejected credentials for user {}: {}", user_id, e);
            return Err(e);
        }

        let envelope = self.cipher.encrypt(&update.access_token)?;

        let fields = CredentialFields {
            access_token: Some(envelope.to_string()),
            public_key: Some(update.public_key.clone()),
        };

        if !self.store.update_credentials(user_id, fields, Utc::now()).await? {
            return Err(VaultError::UserNotFound(user_id.to_string()));
        }

        info!("Updated credentials for user {}", user_id);
        Ok(())
    }

    /// Remove both credential fields
    pub async fn clear_credentials(&self, user_id: &str) -> Result<()> {
        let updated = self
            .store
            .update_credentials(user_id, CredentialFields::cleared(), Utc::now())
            .await?;

        if !updated {
            return Err(VaultError::UserNotFound(user_id.to_string()));
        }

        info!("Cleared credentials for user {}", user_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::CipherKey;
    use crate::storage::{MemoryUserStore, User};
    use async_trait::async_trait;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Memory store that counts credential writes
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryUserStore,
        writes: AtomicUsize,
    }

    #[async_trait]
    impl UserStore for CountingStore {
        async fn insert(&self, user: User) -> Result<()> {
            self.inner.insert(user).await
        }

        async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
            self.inner.find_by_id(id).await
        }

        async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
            self.inner.find_by_email(email).await
        }

        async fn update_credentials(
            &self,
            id: &str,
            fields: CredentialFields,
            updated_at: DateTime<Utc>,
        ) -> Result<bool> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.inner.update_credentials(id, fields, updated_at).await
        }

        fn backend_name(&self) -> &'static str {
            "Counting Storage"
        }
    }

    /// Store whose every call fails
    struct BrokenStore;

    #[async_trait]
    impl UserStore for BrokenStore {
        async fn insert(&self, _user: User) -> Result<()> {
            Err(VaultError::StorageError("disk I/O error".to_string()))
        }

        async fn find_by_id(&self, _id: &str) -> Result<Option<User>> {
            Err(VaultError::StorageError("disk I/O error".to_string()))
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<User>> {
            Err(VaultError::StorageError("disk I/O error".to_string()))
        }

        async fn update_credentials(
            &self,
            _id: &str,
            _fields: CredentialFields,
            _updated_at: DateTime<Utc>,
        ) -> Result<bool> {
            Err(VaultError::StorageError("disk I/O error".to_string()))
        }

        fn backend_name(&self) -> &'static str {
            "Broken Storage"
        }
    }

    fn test_cipher() -> Arc<Cipher> {
        Arc::new(Cipher::new(CipherKey::from_secret("vault-test-secret")))
    }

    async fn test_vault() -> (CredentialVault, Arc<CountingStore>) {
        let store = Arc::new(CountingStore::default());
        store
            .insert(User::new(
                "u1".to_string(),
                "u1@example.com".to_string(),
                "hash".to_string(),
                "User One".to_string(),
            ))
            .await
            .unwrap();

        let vault = CredentialVault::new(store.clone(), test_cipher(), CredentialRules::default());
        (vault, store)
    }

    #[tokio::test]
    async fn test_set_then_get_status() {
        let (vault, store) = test_vault().await;
        let token = "AAAAAAAAAAAAAAAAAAAAAA";

        vault
            .set_credentials("u1", &CredentialUpdate::new(token, "TEST-1234"))
            .await
            .unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert!(status.has_credentials);
        assert_eq!(status.public_key_preview, "...1234");
        assert_eq!(status.access_token_preview, "...AAAA");
        assert_eq!(status.message, "Credentials configured");

        // Stored at rest as an envelope, never as the plaintext
        let stored = store.find_by_id("u1").await.unwrap().unwrap();
        let envelope = stored.access_token.unwrap();
        assert!(!envelope.contains(token));
        assert_eq!(test_cipher().decrypt(&envelope).unwrap().expose(), token);
    }

    #[tokio::test]
    async fn test_preview_uses_decrypted_token_tail() {
        let (vault, _) = test_vault().await;

        vault
            .set_credentials("u1", &CredentialUpdate::new("APP_USR-000000000000-wxyz", "APP_USR-pk-9876"))
            .await
            .unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert_eq!(status.access_token_preview, "...wxyz");
        assert_eq!(status.public_key_preview, "...9876");
    }

    #[tokio::test]
    async fn test_each_update_uses_new_envelope() {
        let (vault, store) = test_vault().await;
        let update = CredentialUpdate::new("A".repeat(22), "TEST-1234");

        vault.set_credentials("u1", &update).await.unwrap();
        let first = store.find_by_id("u1").await.unwrap().unwrap().access_token;
        vault.set_credentials("u1", &update).await.unwrap();
        let second = store.find_by_id("u1").await.unwrap().unwrap().access_token;

        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_short_token_rejected_without_write() {
        let (vault, store) = test_vault().await;

        let result = vault
            .set_credentials("u1", &CredentialUpdate::new("A".repeat(10), "TEST-1234"))
            .await;

        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(!vault.get_status("u1").await.unwrap().has_credentials);
    }

    #[tokio::test]
    async fn test_bad_prefix_rejected() {
        let (vault, store) = test_vault().await;

        let result = vault
            .set_credentials("u1", &CredentialUpdate::new("A".repeat(22), "FOO-123"))
            .await;

        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_fields_rejected() {
        let (vault, store) = test_vault().await;

        let result = vault.set_credentials("u1", &CredentialUpdate::new("", "")).await;
        assert!(matches!(result, Err(VaultError::Validation(_))));
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let (vault, _) = test_vault().await;

        assert!(matches!(vault.get_status("ghost").await, Err(VaultError::UserNotFound(_))));
        assert!(matches!(
            vault
                .set_credentials("ghost", &CredentialUpdate::new("A".repeat(22), "TEST-1234"))
                .await,
            Err(VaultError::UserNotFound(_))
        ));
        assert!(matches!(
            vault.clear_credentials("ghost").await,
            Err(VaultError::UserNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clear_credentials() {
        let (vault, _) = test_vault().await;

        vault
            .set_credentials("u1", &CredentialUpdate::new("A".repeat(22), "TEST-1234"))
            .await
            .unwrap();
        vault.clear_credentials("u1").await.unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert!(!status.has_credentials);
        assert_eq!(status.access_token_preview, "");
        assert_eq!(status.public_key_preview, "");
        assert_eq!(status.message, "Credentials not configured");
    }

    #[tokio::test]
    async fn test_corrupted_envelope_omits_preview() {
        let (vault, store) = test_vault().await;

        let fields = CredentialFields {
            access_token: Some("deadbeef:not-a-ciphertext".to_string()),
            public_key: Some("TEST-5678".to_string()),
        };
        store.update_credentials("u1", fields, Utc::now()).await.unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert!(status.has_credentials);
        assert_eq!(status.access_token_preview, "");
        assert_eq!(status.public_key_preview, "...5678");
    }

    #[tokio::test]
    async fn test_envelope_under_other_key_omits_preview() {
        let (vault, store) = test_vault().await;

        let other = Cipher::new(CipherKey::from_secret("some-other-secret"));
        let fields = CredentialFields {
            access_token: Some(other.encrypt(&"B".repeat(24)).unwrap().to_string()),
            public_key: Some("APP_USR-1111".to_string()),
        };
        store.update_credentials("u1", fields, Utc::now()).await.unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert!(status.has_credentials);
        assert_eq!(status.access_token_preview, "");
    }

    #[tokio::test]
    async fn test_public_key_only_is_not_configured() {
        let (vault, store) = test_vault().await;

        let fields = CredentialFields {
            access_token: None,
            public_key: Some("TEST-4321".to_string()),
        };
        store.update_credentials("u1", fields, Utc::now()).await.unwrap();

        let status = vault.get_status("u1").await.unwrap();
        assert!(!status.has_credentials);
        assert_eq!(status.public_key_preview, "...4321");
    }

    #[tokio::test]
    async fn test_store_failure_surfaces() {
        let vault = CredentialVault::new(Arc::new(BrokenStore), test_cipher(), CredentialRules::default());

        let err = vault.get_status("u1").await.unwrap_err();
        assert!(matches!(err, VaultError::StorageError(_)));
        assert_eq!(err.public_message(), "Internal server error");

        let err = vault
            .set_credentials("u1", &CredentialUpdate::new("A".repeat(22), "TEST-1234"))
            .await
            .unwrap_err();
        assert!(matches!(err, VaultError::StorageError(_)));
    }
}

//! JSON file storage backend
//!
//! Keeps every user record in a single JSON file in the user's data
//! directory. The file is rewritten through a temp file and a rename, so a
//! crash mid-write leaves the previous version intact.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use super::types::{CredentialFields, User};
use super::UserStore;
use crate::error::{Result, VaultError};

/// Current on-disk format version
const FILE_VERSION: u32 = 1;

/// File format for persistent storage
#[derive(Debug, Default, Serialize, Deserialize)]
struct StorageFile {
    version: u32,
    users: HashMap<String, User>,
}

/// User store persisted to a JSON file
pub struct JsonFileUserStore {
    path: PathBuf,
    users: RwLock<HashMap<String, User>>,
}

impl JsonFileUserStore {
    /// Open the store at `path`, loading existing records if the file exists
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let users = if tokio::fs::try_exists(&path).await? {
            let contents = tokio::fs::read_to_string(&path).await?;
            let file: StorageFile = serde_json::from_str(&contents)?;
            if file.version != FILE_VERSION {
                return Err(VaultError::StorageError(format!(
                    "Unsupported storage file version: {}",
                    file.version
                )));
            }
            debug!("Loaded {} users from {:?}", file.users.len(), path);
            file.users
        } else {
            debug!("No existing storage file found at {:?}", path);
            HashMap::new()
        };

        Ok(Self {
            path,
            users: RwLock::new(users),
        })
    }

    /// Get the default storage file location
    pub fn default_path() -> Result<PathBuf> {
        ProjectDirs::from("com", "paykey", "paykey-vault")
            .map(|dirs| dirs.data_dir().join("users.json"))
            .ok_or_else(|| {
                VaultError::StorageError("Could not determine data directory".to_string())
            })
    }

    /// Get the storage file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `users` to disk atomically using a temp file
    async fn persist(&self, users: &HashMap<String, User>) -> Result<()> {
        let file = StorageFile {
            version: FILE_VERSION,
            users: users.clone(),
        };
        let contents = serde_json::to_string_pretty(&file)?;

        let temp_path = self.path.with_extension("tmp");
        tokio::fs::write(&temp_path, &contents).await?;
        tokio::fs::rename(&temp_path, &self.path).await?;

        debug!("Saved {} users to {:?}", users.len(), self.path);
        Ok(())
    }
}

#[async_trait]
impl UserStore for JsonFileUserStore {
    async fn insert(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(VaultError::EmailTaken);
        }
        if users.contains_key(&user.id) {
            return Err(VaultError::StorageError(format!("Duplicate user id: {}", user.id)));
        }

        let mut next = users.clone();
        next.insert(user.id.clone(), user);
        self.persist(&next).await?;
        *users = next;
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

        if !users.contains_key(id) {
            return Ok(false);
        }

        let mut next = users.clone();
        if let Some(user) = next.get_mut(id) {
            user.apply(fields, updated_at);
        }
        self.persist(&next).await?;
        *users = next;

        debug!("Updated credentials for user: {}", id);
        Ok(true)
    }

    fn backend_name(&self) -> &'static str {
        "JSON File Storage"
    }
}

//! Wiring of the vault components from settings

use std::sync::Arc;

use chrono::Duration;
use tracing::info;

use crate::account::AccountService;
use crate::credential::CredentialVault;
use crate::crypto::{Cipher, CipherKey, PasswordHasher};
use crate::error::{AuthError, Result, VaultError};
use crate::session::{Claims, Clock, SystemClock, TokenIssuer};
use crate::settings::Settings;
use crate::storage::UserStore;

/// Every component the vault needs, built once at startup
pub struct VaultServices {
    /// Credential read/write/clear
    pub credentials: CredentialVault,
    /// Registration and login
    pub accounts: AccountService,
    /// Session token issuer
    tokens: Arc<TokenIssuer>,
    /// Storage backend
    store: Arc<dyn UserStore>,
}

impl VaultServices {
    /// Build all components from settings, using the wall clock
    pub fn new(settings: &Settings, store: Arc<dyn UserStore>) -> Result<Self> {
        Self::with_clock(settings, store, Arc::new(SystemClock))
    }

    /// Build all components with an explicit clock for token expiry
    pub fn with_clock(
        settings: &Settings,
        store: Arc<dyn UserStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let hours = settings.token_validity_hours;
        let validity = Duration::try_hours(hours)
            .filter(|_| (1..=TokenIssuer::MAX_VALIDITY_HOURS).contains(&hours))
            .ok_or_else(|| {
                VaultError::ConfigError(format!("Token validity of {} hours is out of range", hours))
            })?;

        let cipher = Arc::new(Cipher::new(CipherKey::from_secret(&settings.encryption_key)));
        let tokens = Arc::new(TokenIssuer::with_clock(
            settings.jwt_secret.as_bytes(),
            validity,
            clock,
        ));
        let hasher = PasswordHasher::new(settings.hash_params.clone())?;

        let credentials = CredentialVault::new(
            store.clone(),
            cipher,
            settings.credential_rules.clone(),
        );
        let accounts = AccountService::new(store.clone(), hasher, tokens.clone());

        info!("Vault services ready ({})", store.backend_name());

        Ok(Self {
            credentials,
            accounts,
            tokens,
            store,
        })
    }

    /// Validate a bearer token and return its claims
    pub fn authenticate(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        self.tokens.validate(token)
    }

    /// Name of the storage backend in use
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

//! Process configuration
//!
//! Keys and policy are read once at startup from the environment and then
//! passed explicitly into the cipher, token issuer and vault. Nothing here is
//! looked up again after construction.

use tracing::warn;

use crate::credential::CredentialRules;
use crate::crypto::HashParams;
use crate::error::{Result, VaultError};
use crate::session::TokenIssuer;

/// Built-in cipher secret used when `ENCRYPTION_KEY` is unset. Insecure.
pub const DEFAULT_ENCRYPTION_KEY: &str = "your-32-char-secret-key-here!!!";

/// Built-in signing secret used when `JWT_SECRET` is unset. Insecure.
pub const DEFAULT_JWT_SECRET: &str = "change-this-jwt-secret-in-production";

pub const ENV_ENCRYPTION_KEY: &str = "ENCRYPTION_KEY";
pub const ENV_JWT_SECRET: &str = "JWT_SECRET";
pub const ENV_TOKEN_VALIDITY_HOURS: &str = "TOKEN_VALIDITY_HOURS";
pub const ENV_PUBLIC_KEY_PREFIXES: &str = "PUBLIC_KEY_PREFIXES";

/// Application settings
#[derive(Clone)]
pub struct Settings {
    /// Secret the cipher key is built from
    pub encryption_key: String,
    /// HS256 signing secret for session tokens
    pub jwt_secret: String,
    /// Session token lifetime in hours
    pub token_validity_hours: i64,
    /// Password hashing cost
    pub hash_params: HashParams,
    /// Acceptance rules for provider credentials
    pub credential_rules: CredentialRules,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            encryption_key: DEFAULT_ENCRYPTION_KEY.to_string(),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_validity_hours: TokenIssuer::DEFAULT_VALIDITY_HOURS,
            hash_params: HashParams::default(),
            credential_rules: CredentialRules::default(),
        }
    }
}

impl Settings {
    /// Load settings from process environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load settings through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();
        let value = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        match value(ENV_ENCRYPTION_KEY) {
            Some(key) => settings.encryption_key = key,
            None => warn!(
                "{} is not set - using the insecure built-in encryption key",
                ENV_ENCRYPTION_KEY
            ),
        }

        match value(ENV_JWT_SECRET) {
            Some(secret) => settings.jwt_secret = secret,
            None => warn!(
                "{} is not set - using the insecure built-in signing secret",
                ENV_JWT_SECRET
            ),
        }

        if let Some(hours) = value(ENV_TOKEN_VALIDITY_HOURS) {
            let hours: i64 = hours.trim().parse().map_err(|_| {
                VaultError::ConfigError(format!("{} must be a whole number", ENV_TOKEN_VALIDITY_HOURS))
            })?;
            if !(1..=TokenIssuer::MAX_VALIDITY_HOURS).contains(&hours) {
                return Err(VaultError::ConfigError(format!(
                    "{} must be between 1 and {}",
                    ENV_TOKEN_VALIDITY_HOURS,
                    TokenIssuer::MAX_VALIDITY_HOURS
                )));
            }
            settings.token_validity_hours = hours;
        }

        if let Some(prefixes) = value(ENV_PUBLIC_KEY_PREFIXES) {
            let prefixes: Vec<String> = prefixes
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect();
            if prefixes.is_empty() {
                return Err(VaultError::ConfigError(format!(
                    "{} must list at least one prefix",
                    ENV_PUBLIC_KEY_PREFIXES
                )));
            }
            settings.credential_rules.public_key_prefixes = prefixes;
        }

        Ok(settings)
    }
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("encryption_key", &"[REDACTED]")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_validity_hours", &self.token_validity_hours)
            .field("hash_params", &self.hash_params)
            .field("credential_rules", &self.credential_rules)
            .finish()
    }
}

//! Credential type definitions

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, VaultError};

/// Marker placed in front of a masked value
pub const PREVIEW_MASK: &str = "...";

/// Number of trailing characters a preview reveals
pub const PREVIEW_CHARS: usize = 4;

/// Whether a user has a full credential pair configured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CredentialState {
    NotConfigured,
    Configured,
}

/// Masked view of a user's credentials (safe to display)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialStatus {
    /// Both fields are stored (says nothing about decryptability)
    pub has_credentials: bool,

    /// `...` plus the last 4 characters of the access token, or empty
    pub access_token_preview: String,

    /// `...` plus the last 4 characters of the public key, or empty
    pub public_key_preview: String,

    pub message: String,
}

impl CredentialStatus {
    pub fn state(&self) -> CredentialState {
        if self.has_credentials {
            CredentialState::Configured
        } else {
            CredentialState::NotConfigured
        }
    }
}

/// New credentials submitted by a user - zeroed when dropped
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialUpdate {
    #[serde(default)]
    pub access_token: String,
    #[serde(default)]
    pub public_key: String,
}

impl CredentialUpdate {
    pub fn new(access_token: impl Into<String>, public_key: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            public_key: public_key.into(),
        }
    }
}

impl std::fmt::Debug for CredentialUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialUpdate")
            .field("access_token", &"[REDACTED]")
            .field("public_key", &self.public_key)
            .finish()
    }
}

/// Acceptance rules for submitted credentials
#[derive(Debug, Clone)]
pub struct CredentialRules {
    /// Shortest plausible access token, in characters
    pub min_access_token_len: usize,
    /// A public key must start with one of these
    pub public_key_prefixes: Vec<String>,
}

impl Default for CredentialRules {
    fn default() -> Self {
        Self {
            min_access_token_len: 20,
            public_key_prefixes: vec!["APP_USR".to_string(), "TEST".to_string()],
        }
    }
}

impl CredentialRules {
    /// Check an update before any cryptographic or storage work
    pub fn validate(&self, update: &CredentialUpdate) -> Result<()> {
        if update.access_token.is_empty() || update.public_key.is_empty() {
            return Err(VaultError::Validation(
                "Access token and public key are required".to_string(),
            ));
        }

        if update.access_token.chars().count() < self.min_access_token_len {
            return Err(VaultError::Validation("Invalid access token".to_string()));
        }

        if !self
            .public_key_prefixes
            .iter()
            .any(|prefix| update.public_key.starts_with(prefix.as_str()))
        {
            return Err(VaultError::Validation(format!(
                "Public key must start with {}",
                self.public_key_prefixes.join(" or ")
            )));
        }

        Ok(())
    }
}

/// Last 4 characters of `value` behind the mask, or empty if it is too short
/// to mask
pub fn mask_tail(value: &str) -> String {
    let count = value.chars().count();
    if count <= PREVIEW_CHARS {
        return String::new();
    }
    let tail: String = value.chars().skip(count - PREVIEW_CHARS).collect();
    format!("{}{}", PREVIEW_MASK, tail)
}

/// Preview of a public key. Keys too short to mask are shown as they are,
/// since public keys are not secret.
pub fn public_key_preview(public_key: &str) -> String {
    if public_key.chars().count() > PREVIEW_CHARS {
        mask_tail(public_key)
    } else {
        public_key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_tail() {
        assert_eq!(mask_tail("APP_USR-123456789"), "...6789");
        assert_eq!(mask_tail("abcde"), "...bcde");
        assert_eq!(mask_tail("abcd"), "");
        assert_eq!(mask_tail(""), "");
        assert_eq!(mask_tail("tokenção"), "...nção");
    }

    #[test]
    fn test_public_key_preview() {
        assert_eq!(public_key_preview("TEST-1234"), "...1234");
        assert_eq!(public_key_preview("TEST"), "TEST");
    }

    #[test]
    fn test_rules_accept_valid_update() {
        let rules = CredentialRules::default();
        let update = CredentialUpdate::new("A".repeat(20), "APP_USR-abc");
        assert!(rules.validate(&update).is_ok());
    }

    #[test]
    fn test_rules_reject_empty_fields() {
        let rules = CredentialRules::default();
        assert!(rules.validate(&CredentialUpdate::new("", "TEST-1")).is_err());
        assert!(rules.validate(&CredentialUpdate::new("A".repeat(30), "")).is_err());
    }

    #[test]
    fn test_rules_reject_short_token() {
        let rules = CredentialRules::default();
        let err = rules
            .validate(&CredentialUpdate::new("A".repeat(19), "TEST-1"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid access token");
    }

    #[test]
    fn test_rules_reject_bad_prefix() {
        let rules = CredentialRules::default();
        let err = rules
            .validate(&CredentialUpdate::new("A".repeat(22), "FOO-123"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Public key must start with APP_USR or TEST");
        // Prefix match is case-sensitive
        assert!(rules.validate(&CredentialUpdate::new("A".repeat(22), "test-123")).is_err());
    }

    #[test]
    fn test_custom_rules() {
        let rules = CredentialRules {
            min_access_token_len: 8,
            public_key_prefixes: vec!["pk_".to_string()],
        };
        assert!(rules.validate(&CredentialUpdate::new("12345678", "pk_live")).is_ok());
        assert!(rules.validate(&CredentialUpdate::new("12345678", "TEST-1")).is_err());
    }

    #[test]
    fn test_update_debug_redacts_token() {
        let update = CredentialUpdate::new("super-secret-access-token", "TEST-1");
        let debug = format!("{:?}", update);
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("TEST-1"));
    }

    #[test]
    fn test_status_serializes_camel_case() {
        let status = CredentialStatus {
            has_credentials: true,
            access_token_preview: "...abcd".to_string(),
            public_key_preview: "...1234".to_string(),
            message: "Credentials configured".to_string(),
        };
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["hasCredentials"], true);
        assert_eq!(json["accessTokenPreview"], "...abcd");
        assert_eq!(status.state(), CredentialState::Configured);
    }
}

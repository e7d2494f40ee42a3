//! Session token issuance and validation
//!
//! Tokens are stateless HS256 JWTs carrying the user's identity claims.
//! Nothing is persisted server-side: a token stops working when it expires or
//! when the signing secret changes.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuthError, Result, VaultError};

/// Identity carried by a session token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub user_id: String,
    pub email: String,
    pub name: String,
}

/// Signed payload
#[derive(Debug, Serialize, Deserialize)]
struct TokenClaims {
    #[serde(rename = "userId")]
    user_id: String,
    email: String,
    name: String,
    iat: i64,
    exp: i64,
}

/// Source of the current time
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Issues and validates session tokens
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validity: Duration,
    clock: Arc<dyn Clock>,
}

impl TokenIssuer {
    /// Default token lifetime: 24 hours
    pub const DEFAULT_VALIDITY_HOURS: i64 = 24;

    /// Longest accepted token lifetime: ten years
    pub const MAX_VALIDITY_HOURS: i64 = 24 * 366 * 10;

    /// Create an issuer signing with `secret`, using the wall clock
    pub fn new(secret: &[u8], validity: Duration) -> Self {
        Self::with_clock(secret, validity, Arc::new(SystemClock))
    }

    /// Create an issuer with an explicit clock
    pub fn with_clock(secret: &[u8], validity: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validity,
            clock,
        }
    }

    /// Sign a token for `claims`, expiring after the validity window
    pub fn issue(&self, claims: &Claims) -> Result<String> {
        let now = self.clock.now();
        let expires_at = now.checked_add_signed(self.validity).ok_or_else(|| {
            VaultError::ConfigError("Token validity window overflows the clock".to_string())
        })?;

        let payload = TokenClaims {
            user_id: claims.user_id.clone(),
            email: claims.email.clone(),
            name: claims.name.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &payload, &self.encoding_key)
            .map_err(|e| VaultError::CryptoError(format!("Failed to sign token: {}", e)))?;

        debug!("Issued session token for {} expiring at {}", claims.user_id, expires_at);
        Ok(token)
    }

    /// Check signature and expiry, returning the embedded claims
    pub fn validate(&self, token: &str) -> std::result::Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked against the injected clock below
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<TokenClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            debug!("Rejected session token: {}", e);
            AuthError::Invalid
        })?;

        let payload = data.claims;
        if payload.exp <= self.clock.now().timestamp() {
            return Err(AuthError::Expired);
        }

        Ok(Claims {
            user_id: payload.user_id,
            email: payload.email,
            name: payload.name,
        })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("key", &"[REDACTED]")
            .field("validity", &self.validity)
            .finish()
    }
}

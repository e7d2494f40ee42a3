//! Account registration and login

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::{validate_password, PasswordHasher};
use crate::error::{Result, VaultError};
use crate::session::{Claims, TokenIssuer};
use crate::storage::{User, UserStore};

/// Registration form - zeroed when dropped
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub name: String,
}

/// Login form - zeroed when dropped
#[derive(Clone, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Public view of a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        }
    }
}

/// Result of a successful registration or login
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub token: String,
    pub user: UserProfile,
}

/// Creates accounts and exchanges passwords for session tokens
pub struct AccountService {
    store: Arc<dyn UserStore>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
}

impl AccountService {
    pub fn new(store: Arc<dyn UserStore>, hasher: PasswordHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Register a new user and log them in
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthSession> {
        if request.email.is_empty() || request.password.is_empty() || request.name.trim().is_empty() {
            return Err(VaultError::Validation(
                "Email, password and name are required".to_string(),
            ));
        }

        let email = request.email.trim().to_lowercase();
        if !is_valid_email(&email) {
            return Err(VaultError::Validation("Invalid email".to_string()));
        }

        validate_password(&request.password)?;

        if self.store.find_by_email(&email).await?.is_some() {
            debug!("Registration attempt with existing email");
            return Err(VaultError::EmailTaken);
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = User::new(
            Uuid::new_v4().to_string(),
            email,
            password_hash,
            request.name.trim().to_string(),
        );
        let profile = UserProfile::from(&user);

        self.store.insert(user).await?;
        info!("Registered user {}", profile.id);

        self.start_session(profile)
    }

    /// Check a user's password and issue a session token
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthSession> {
        if request.email.is_empty() || request.password.is_empty() {
            return Err(VaultError::Validation(
                "Email and password are required".to_string(),
            ));
        }

        let email = request.email.trim().to_lowercase();
        let user = match self.store.find_by_email(&email).await? {
            Some(user) => user,
            None => {
                debug!("Login attempt for unknown email");
                return Err(VaultError::InvalidCredentials);
            }
        };

        if !self.hasher.verify(&request.password, &user.password_hash) {
            debug!("Wrong password for user {}", user.id);
            return Err(VaultError::InvalidCredentials);
        }

        info!("User {} logged in", user.id);
        self.start_session(UserProfile::from(&user))
    }

    /// Current profile of an authenticated user
    pub async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        self.store
            .find_by_id(user_id)
            .await?
            .map(|user| UserProfile::from(&user))
            .ok_or_else(|| VaultError::UserNotFound(user_id.to_string()))
    }

    fn start_session(&self, user: UserProfile) -> Result<AuthSession> {
        let token = self.tokens.issue(&Claims {
            user_id: user.id.clone(),
            email: user.email.clone(),
            name: user.name.clone(),
        })?;
        Ok(AuthSession { token, user })
    }
}

/// Shape check: one `@`, non-empty local part, dotted domain
fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

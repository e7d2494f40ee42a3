//! Cryptographic primitives for the vault
//!
//! This module provides:
//! - AES-256-GCM encryption of stored access tokens (16-byte IV envelopes)
//! - Argon2id password hashing and verification
//! - Secure memory handling with zeroize

mod cipher;
mod password;
mod secure_memory;

pub use cipher::{Cipher, Envelope, IV_LEN};
pub use password::{validate_password, HashParams, PasswordHasher, MIN_PASSWORD_LENGTH};
pub use secure_memory::{CipherKey, SecretString};

//! AES-256-GCM encryption of stored credentials
//!
//! Envelope format: `{iv_hex}:{ciphertext_hex}`
//! - IV: 16 bytes, freshly random for every encryption
//! - Ciphertext: variable length, with the 16-byte auth tag appended

use std::str::FromStr;

use aes_gcm::{
    aead::{consts::U16, Aead, KeyInit},
    aes::Aes256,
    AesGcm, Nonce,
};
use rand::RngCore;
use tracing::debug;

use super::{CipherKey, SecretString};
use crate::error::{Result, VaultError};

/// IV length in bytes
pub const IV_LEN: usize = 16;

/// Authentication tag length in bytes
const TAG_LEN: usize = 16;

/// AES-256-GCM with a 128-bit nonce
type Aes256Gcm16 = AesGcm<Aes256, U16>;

/// One encryption of one plaintext under the vault key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    /// Initialization vector
    pub iv: [u8; IV_LEN],
    /// Encrypted bytes followed by the auth tag
    pub ciphertext: Vec<u8>,
}

impl std::fmt::Display for Envelope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", hex::encode(self.iv), hex::encode(&self.ciphertext))
    }
}

impl FromStr for Envelope {
    type Err = VaultError;

    /// Parse from the format: `{iv_hex}:{ciphertext_hex}`
    fn from_str(s: &str) -> Result<Self> {
        let (iv_hex, ciphertext_hex) = s.split_once(':').ok_or_else(|| {
            VaultError::CryptoError("Invalid envelope format: expected iv:ciphertext".to_string())
        })?;

        let iv_bytes = hex::decode(iv_hex)
            .map_err(|e| VaultError::CryptoError(format!("Invalid IV hex: {}", e)))?;
        let ciphertext = hex::decode(ciphertext_hex)
            .map_err(|e| VaultError::CryptoError(format!("Invalid ciphertext hex: {}", e)))?;

        let iv: [u8; IV_LEN] = iv_bytes.as_slice().try_into().map_err(|_| {
            VaultError::CryptoError(format!(
                "Invalid IV length: expected {}, got {}",
                IV_LEN,
                iv_bytes.len()
            ))
        })?;

        if ciphertext.len() < TAG_LEN {
            return Err(VaultError::CryptoError("Ciphertext truncated".to_string()));
        }

        Ok(Self { iv, ciphertext })
    }
}

/// Symmetric cipher bound to the process-wide vault key
#[derive(Debug)]
pub struct Cipher {
    key: CipherKey,
}

impl Cipher {
    /// Create a cipher for the given key
    pub fn new(key: CipherKey) -> Self {
        Self { key }
    }

    /// Encrypt `plaintext` under a fresh random IV
    pub fn encrypt(&self, plaintext: &str) -> Result<Envelope> {
        let cipher = Aes256Gcm16::new_from_slice(self.key.as_bytes())
            .map_err(|e| VaultError::CryptoError(e.to_string()))?;

        let mut iv = [0u8; IV_LEN];
        rand::thread_rng().fill_bytes(&mut iv);

        let ciphertext = cipher
            .encrypt(Nonce::<U16>::from_slice(&iv), plaintext.as_bytes())
            .map_err(|e| VaultError::CryptoError(e.to_string()))?;

        Ok(Envelope { iv, ciphertext })
    }

    /// Decrypt an envelope, reporting why it failed
    pub fn open(&self, envelope: &Envelope) -> Result<SecretString> {
        let cipher = Aes256Gcm16::new_from_slice(self.key.as_bytes())
            .map_err(|e| VaultError::CryptoError(e.to_string()))?;

        let plaintext = cipher
            .decrypt(Nonce::<U16>::from_slice(&envelope.iv), envelope.ciphertext.as_slice())
            .map_err(|e| VaultError::CryptoError(e.to_string()))?;

        String::from_utf8(plaintext)
            .map(SecretString::new)
            .map_err(|e| VaultError::CryptoError(format!("Invalid UTF-8: {}", e)))
    }

    /// Decrypt a serialized envelope.
    ///
    /// Returns `None` for anything that does not decrypt cleanly: bad format,
    /// wrong key, tampering or truncation.
    pub fn decrypt(&self, envelope: &str) -> Option<SecretString> {
        let result = envelope.parse::<Envelope>().and_then(|env| self.open(&env));
        match result {
            Ok(secret) => Some(secret),
            Err(e) => {
                debug!("Envelope did not decrypt: {}", e);
                None
            }
        }
    }
}

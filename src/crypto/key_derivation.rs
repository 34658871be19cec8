//! Key derivation using Argon2id
//!
//! Turns the secret retrieved for a purpose into the 32-byte AES-256 key.
//! The salt and cost parameters live in the settings file so every run
//! derives the same key from the same secret.

use argon2::{password_hash::SaltString, Argon2, Params};
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{DecryptError, DecryptResult};

/// Application salt used when settings do not provide one (base64, no padding)
pub const DEFAULT_SALT: &str = "ZGVjcnlwdC10YWJsZXMtc2FsdA";

/// Parameters for key derivation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDerivationParams {
    /// Salt for key derivation (base64 encoded, no padding)
    pub salt: String,
    /// Memory cost in KiB (default: 65536 = 64 MiB)
    pub memory_cost: u32,
    /// Time cost (iterations, default: 3)
    pub time_cost: u32,
    /// Parallelism degree (default: 4)
    pub parallelism: u32,
}

impl Default for KeyDerivationParams {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SALT.to_string(),
            memory_cost: 65536, // 64 MiB
            time_cost: 3,
            parallelism: 4,
        }
    }
}

impl KeyDerivationParams {
    /// Create params with specific values
    pub fn with_values(salt: String, memory_cost: u32, time_cost: u32, parallelism: u32) -> Self {
        Self {
            salt,
            memory_cost,
            time_cost,
            parallelism,
        }
    }
}

/// A derived encryption key, zeroed on drop
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

/// Derive an encryption key from a secret
pub fn derive_key(secret: &str, params: &KeyDerivationParams) -> DecryptResult<DerivedKey> {
    let salt = SaltString::from_b64(&params.salt)
        .map_err(|e| DecryptError::Encryption(format!("Invalid salt: {}", e)))?;

    let argon2_params = Params::new(
        params.memory_cost,
        params.time_cost,
        params.parallelism,
        Some(32), // Output length for AES-256
    )
    .map_err(|e| DecryptError::Encryption(format!("Invalid Argon2 parameters: {}", e)))?;

    let argon2 = Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut salt_bytes = [0u8; 64];
    let salt_bytes = salt
        .as_salt()
        .decode_b64(&mut salt_bytes)
        .map_err(|e| DecryptError::Encryption(format!("Invalid salt: {}", e)))?;

    let mut key = [0u8; 32];
    argon2
        .hash_password_into(secret.as_bytes(), salt_bytes, &mut key)
        .map_err(|e| DecryptError::Encryption(format!("Key derivation failed: {}", e)))?;

    Ok(DerivedKey { key })
}

#[cfg(test)]
pub(crate) fn fast_params() -> KeyDerivationParams {
    KeyDerivationParams::with_values(DEFAULT_SALT.to_string(), 1024, 1, 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_key() {
        let key = derive_key("test_passphrase", &fast_params()).unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_same_secret_same_key() {
        let key1 = derive_key("test_passphrase", &fast_params()).unwrap();
        let key2 = derive_key("test_passphrase", &fast_params()).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_secret_different_key() {
        let key1 = derive_key("passphrase1", &fast_params()).unwrap();
        let key2 = derive_key("passphrase2", &fast_params()).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let mut other = fast_params();
        other.salt = "c29tZS1vdGhlci1zYWx0".to_string();
        let key1 = derive_key("same_passphrase", &fast_params()).unwrap();
        let key2 = derive_key("same_passphrase", &other).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_invalid_salt_rejected() {
        let mut params = fast_params();
        params.salt = "!".to_string();
        assert!(matches!(
            derive_key("x", &params),
            Err(DecryptError::Encryption(_))
        ));
    }

    #[test]
    fn test_default_params_valid() {
        let params = KeyDerivationParams::default();
        assert!(SaltString::from_b64(&params.salt).is_ok());
    }
}

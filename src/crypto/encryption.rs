//! AES-256-GCM cell decryption
//!
//! An encrypted cell is the standard base64 encoding of the 12-byte nonce
//! followed by the ciphertext and its authentication tag. Anything that does
//! not decode, authenticate and yield UTF-8 is a decryption failure.

use aes_gcm::aead::rand_core::RngCore;
use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{DecryptError, DecryptResult};

use super::{derive_key, DerivedKey, KeyDerivationParams, SecretState, SecretStore};

/// Size of the AES-GCM nonce in bytes (96 bits)
const NONCE_SIZE: usize = 12;

/// Size of the AES-GCM authentication tag in bytes
const TAG_SIZE: usize = 16;

/// The decryption capability the pipeline depends on
///
/// Implementations must be deterministic per input: the same cell either
/// always decrypts or always fails.
pub trait CellDecryptor: Sync {
    fn decrypt_cell(&self, ciphertext: &str) -> DecryptResult<String>;
}

impl<T: CellDecryptor + ?Sized> CellDecryptor for &T {
    fn decrypt_cell(&self, ciphertext: &str) -> DecryptResult<String> {
        (**self).decrypt_cell(ciphertext)
    }
}

/// AES-256-GCM cipher keyed from a retrieved secret
pub struct AesGcmCellCipher {
    cipher: Aes256Gcm,
}

impl AesGcmCellCipher {
    /// Create a cipher from an already derived key
    pub fn new(key: &DerivedKey) -> DecryptResult<Self> {
        let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
            .map_err(|e| DecryptError::Encryption(format!("Failed to create cipher: {}", e)))?;
        Ok(Self { cipher })
    }

    /// Retrieve the decrypted secret for `purpose` and derive the key once
    pub fn from_store(
        store: &dyn SecretStore,
        purpose: &str,
        params: &KeyDerivationParams,
    ) -> DecryptResult<Self> {
        let secret = store.secret(purpose, SecretState::Decrypted)?;
        let key = derive_key(&secret, params)?;
        Self::new(&key)
    }

    /// Encrypt a cell value into its base64 token
    pub fn encrypt_cell(&self, plaintext: &str) -> DecryptResult<String> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher
            .encrypt(nonce, plaintext.as_bytes())
            .map_err(|e| DecryptError::Encryption(format!("Encryption failed: {}", e)))?;

        let mut token = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        token.extend_from_slice(&nonce_bytes);
        token.extend_from_slice(&ciphertext);
        Ok(STANDARD.encode(token))
    }
}

impl CellDecryptor for AesGcmCellCipher {
    fn decrypt_cell(&self, ciphertext: &str) -> DecryptResult<String> {
        let raw = STANDARD
            .decode(ciphertext.trim())
            .map_err(|e| DecryptError::cell(format!("invalid ciphertext encoding: {}", e)))?;

        if raw.len() < NONCE_SIZE + TAG_SIZE {
            return Err(DecryptError::cell(format!(
                "ciphertext too short: expected at least {} bytes, got {}",
                NONCE_SIZE + TAG_SIZE,
                raw.len()
            )));
        }

        let (nonce_bytes, body) = raw.split_at(NONCE_SIZE);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce_bytes), body)
            .map_err(|_| DecryptError::cell("invalid key or corrupted data"))?;

        String::from_utf8(plaintext)
            .map_err(|e| DecryptError::cell(format!("invalid UTF-8 in decrypted data: {}", e)))
    }
}

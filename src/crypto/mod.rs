//! Cryptographic capabilities for decrypt-tables
//!
//! Provides AES-256-GCM cell decryption keyed with Argon2id from a secret
//! looked up by purpose.

pub mod encryption;
pub mod key_derivation;
pub mod secrets;
pub mod secure_memory;

pub use encryption::{AesGcmCellCipher, CellDecryptor};
pub use key_derivation::{derive_key, DerivedKey, KeyDerivationParams};
pub use secrets::{EnvSecretStore, MemorySecretStore, SecretState, SecretStore};
pub use secure_memory::SecureString;

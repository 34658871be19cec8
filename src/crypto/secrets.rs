//! Secret retrieval
//!
//! Secrets are looked up by a purpose tag (for example `PII`) and the form
//! the caller wants them in. The pipeline never sees where they come from.

use std::collections::HashMap;
use std::fmt;

use crate::error::{DecryptError, DecryptResult};

use super::SecureString;

/// Prefix for environment variables holding secrets
pub const SECRET_ENV_PREFIX: &str = "DECRYPT_TABLES_SECRET_";

/// The form a secret is requested in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SecretState {
    /// Usable plaintext secret
    Decrypted,
    /// Secret as stored at rest
    Encrypted,
}

impl fmt::Display for SecretState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Decrypted => write!(f, "decrypted"),
            Self::Encrypted => write!(f, "encrypted"),
        }
    }
}

/// Looks up secrets by purpose and state
pub trait SecretStore {
    fn secret(&self, purpose: &str, state: SecretState) -> DecryptResult<SecureString>;
}

/// Reads decrypted secrets from `DECRYPT_TABLES_SECRET_<PURPOSE>`
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    /// Name of the variable that holds the secret for `purpose`
    pub fn variable_name(purpose: &str) -> String {
        let purpose: String = purpose
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_uppercase()
                } else {
                    '_'
                }
            })
            .collect();
        format!("{}{}", SECRET_ENV_PREFIX, purpose)
    }
}

impl SecretStore for EnvSecretStore {
    fn secret(&self, purpose: &str, state: SecretState) -> DecryptResult<SecureString> {
        if state != SecretState::Decrypted {
            return Err(DecryptError::Secret(format!(
                "the environment only holds {} secrets, {} was requested for '{}'",
                SecretState::Decrypted,
                state,
                purpose
            )));
        }

        let name = Self::variable_name(purpose);
        match std::env::var(&name) {
            Ok(value) if !value.is_empty() => Ok(SecureString::new(value)),
            Ok(_) => Err(DecryptError::Secret(format!("{} is empty", name))),
            Err(_) => Err(DecryptError::Secret(format!(
                "no secret for purpose '{}' (set {})",
                purpose, name
            ))),
        }
    }
}

/// In-memory secret store for tests and embedding callers
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    secrets: HashMap<(String, SecretState), SecureString>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret, replacing any previous one for the same key
    pub fn with_secret(
        mut self,
        purpose: impl Into<String>,
        state: SecretState,
        secret: impl Into<SecureString>,
    ) -> Self {
        self.secrets.insert((purpose.into(), state), secret.into());
        self
    }
}

impl SecretStore for MemorySecretStore {
    fn secret(&self, purpose: &str, state: SecretState) -> DecryptResult<SecureString> {
        self.secrets
            .get(&(purpose.to_string(), state))
            .cloned()
            .ok_or_else(|| {
                DecryptError::Secret(format!("no {} secret for purpose '{}'", state, purpose))
            })
    }
}

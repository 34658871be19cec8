//! Tool settings for decrypt-tables
//!
//! Persistent preferences read from `settings.json`: the output suffix, the
//! secret purpose, key derivation parameters and default parallelism.

use serde::{Deserialize, Serialize};

use super::paths::{AppPaths, DEFAULT_OUTPUT_SUFFIX};
use crate::crypto::key_derivation::KeyDerivationParams;
use crate::error::DecryptError;

/// Settings for decrypt-tables
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Suffix inserted before the extension of CSV outputs
    #[serde(default = "default_output_suffix")]
    pub output_suffix: String,

    /// Purpose tag the decryption secret is looked up under
    #[serde(default = "default_secret_purpose")]
    pub secret_purpose: String,

    /// Argon2id parameters used to turn the secret into a key
    #[serde(default)]
    pub key_params: KeyDerivationParams,

    /// Units processed in parallel when `--jobs` is not given
    #[serde(default = "default_jobs")]
    pub jobs: usize,
}

fn default_schema_version() -> u32 {
    1
}

fn default_output_suffix() -> String {
    DEFAULT_OUTPUT_SUFFIX.to_string()
}

fn default_secret_purpose() -> String {
    "PII".to_string()
}

fn default_jobs() -> usize {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            output_suffix: default_output_suffix(),
            secret_purpose: default_secret_purpose(),
            key_params: KeyDerivationParams::default(),
            jobs: default_jobs(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or use defaults if the file doesn't exist
    pub fn load_or_default(paths: &AppPaths) -> Result<Self, DecryptError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path).map_err(|e| {
            DecryptError::ConfigInvalid(format!(
                "Failed to read settings file {}: {}",
                settings_path.display(),
                e
            ))
        })?;

        let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
            DecryptError::ConfigInvalid(format!(
                "Failed to parse settings file {}: {}",
                settings_path.display(),
                e
            ))
        })?;

        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), DecryptError> {
        // An empty suffix would name every output after its input
        if self.output_suffix.is_empty() {
            return Err(DecryptError::ConfigInvalid(
                "output_suffix must not be empty".into(),
            ));
        }
        if self.secret_purpose.trim().is_empty() {
            return Err(DecryptError::ConfigInvalid(
                "secret_purpose must not be empty".into(),
            ));
        }
        if self.jobs == 0 {
            return Err(DecryptError::ConfigInvalid("jobs must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.output_suffix, "_DECRYPTED");
        assert_eq!(settings.secret_purpose, "PII");
        assert_eq!(settings.jobs, 1);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        assert_eq!(Settings::load_or_default(&paths).unwrap(), Settings::default());
    }

    #[test]
    fn test_load_written_settings() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        let settings = Settings {
            output_suffix: "_PLAIN".into(),
            jobs: 4,
            ..Settings::default()
        };
        std::fs::write(paths.settings_file(), serde_json::to_string_pretty(&settings).unwrap())
            .unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.output_suffix, "_PLAIN");
        assert_eq!(loaded.jobs, 4);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"secret_purpose":"CARD"}"#).unwrap();

        let loaded = Settings::load_or_default(&paths).unwrap();
        assert_eq!(loaded.secret_purpose, "CARD");
        assert_eq!(loaded.output_suffix, "_DECRYPTED");
    }

    #[test]
    fn test_unparsable_file_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), "{not json").unwrap();

        assert!(matches!(
            Settings::load_or_default(&paths),
            Err(DecryptError::ConfigInvalid(_))
        ));
    }

    #[test]
    fn test_zero_jobs_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"jobs":0}"#).unwrap();

        assert!(Settings::load_or_default(&paths).is_err());
    }

    #[test]
    fn test_empty_output_suffix_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());
        std::fs::write(paths.settings_file(), r#"{"output_suffix":""}"#).unwrap();

        assert!(matches!(
            Settings::load_or_default(&paths),
            Err(DecryptError::ConfigInvalid(_))
        ));
    }
}

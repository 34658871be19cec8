//! CLI command handler for database mode

use std::path::Path;

use tracing::info;

use crate::config::{RunConfig, Settings};
use crate::crypto::SecretStore;
use crate::error::DecryptResult;
use crate::services::BatchReport;

/// Handle `--config`
///
/// The whole configuration is validated before the secret is retrieved or
/// any database is contacted.
pub fn handle_config_command(
    config_path: &Path,
    settings: &Settings,
    store: &dyn SecretStore,
    jobs: usize,
) -> DecryptResult<BatchReport> {
    let config = RunConfig::load(config_path)?;
    let units = config.units();
    info!(
        databases = config.databases.len(),
        tables = units.len(),
        "configuration loaded"
    );

    super::run_and_report(&units, settings, store, jobs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::MemorySecretStore;
    use crate::error::DecryptError;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_config_fails_before_secret_lookup() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"databases": []}"#).unwrap();

        // The empty store would fail with a secret error if it were consulted
        let result = handle_config_command(&path, &Settings::default(), &MemorySecretStore::new(), 1);
        assert!(matches!(result, Err(DecryptError::ConfigInvalid(_))));
    }

    #[test]
    fn test_missing_secret_fails_the_run() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{"databases":[{"connectionString":"sqlite://nowhere.db","tables":[{"tableName":"t","outputFile":"t.csv"}]}]}"#,
        )
        .unwrap();

        let result = handle_config_command(&path, &Settings::default(), &MemorySecretStore::new(), 1);
        assert!(matches!(result, Err(DecryptError::Secret(_))));
    }
}

//! CLI command handler for file mode
//!
//! `--path` names either one CSV file or a directory of them.

use std::path::Path;

use crate::config::paths::{decrypted_output_path, discover_csv_files};
use crate::config::Settings;
use crate::crypto::SecretStore;
use crate::error::{DecryptError, DecryptResult};
use crate::models::TableUnit;
use crate::services::BatchReport;

/// Handle `--path`
///
/// A missing path or a directory without CSV files is reported and ends the
/// run normally, before any secret is retrieved.
pub fn handle_path_command(
    path: &Path,
    recursive: bool,
    settings: &Settings,
    store: &dyn SecretStore,
    jobs: usize,
) -> DecryptResult<BatchReport> {
    if !path.exists() {
        println!("The provided path does not exist: {}", path.display());
        return Ok(BatchReport::default());
    }

    let units = csv_units(path, recursive, &settings.output_suffix)?;

    if units.is_empty() {
        println!("No CSV files found in the specified directory.");
        return Ok(BatchReport::default());
    }

    super::run_and_report(&units, settings, store, jobs)
}

/// Build one unit per CSV file selected by `path`
///
/// A file path is taken as is, whatever its extension. An output that
/// would land on its own input is refused.
pub fn csv_units(path: &Path, recursive: bool, suffix: &str) -> DecryptResult<Vec<TableUnit>> {
    if !path.exists() {
        return Err(DecryptError::SourceUnavailable(format!(
            "Path not found: {}",
            path.display()
        )));
    }

    let files = if path.is_dir() {
        discover_csv_files(path, recursive, suffix)?
    } else {
        vec![path.to_path_buf()]
    };

    files
        .into_iter()
        .map(|file| {
            let output = decrypted_output_path(&file, suffix);
            if output == file {
                return Err(DecryptError::ConfigInvalid(format!(
                    "output for {} would overwrite the input",
                    file.display()
                )));
            }
            Ok(TableUnit::csv(file, output))
        })
        .collect()
}

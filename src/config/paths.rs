//! Path management for decrypt-tables
//!
//! Resolves the settings directory, derives output paths for CSV mode and
//! discovers CSV files under a directory.
//!
//! ## Settings Directory Resolution Order
//!
//! 1. `DECRYPT_TABLES_HOME` environment variable (if set)
//! 2. `$XDG_CONFIG_HOME/decrypt-tables`
//! 3. The platform config directory (`~/.config`, `%APPDATA%`, ...)

use std::path::{Path, PathBuf};

use directories::BaseDirs;
use walkdir::WalkDir;

use crate::error::{DecryptError, DecryptResult};

/// Suffix inserted before the extension of CSV outputs
pub const DEFAULT_OUTPUT_SUFFIX: &str = "_DECRYPTED";

/// Manages the paths used by decrypt-tables
#[derive(Debug, Clone)]
pub struct AppPaths {
    base_dir: PathBuf,
}

impl AppPaths {
    /// Resolve the settings directory
    ///
    /// # Errors
    ///
    /// Returns an error if no home or config directory can be determined.
    pub fn new() -> DecryptResult<Self> {
        let base_dir = if let Ok(custom) = std::env::var("DECRYPT_TABLES_HOME") {
            PathBuf::from(custom)
        } else {
            resolve_default_path()?
        };

        Ok(Self { base_dir })
    }

    /// Create AppPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("settings.json")
    }
}

fn resolve_default_path() -> DecryptResult<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join("decrypt-tables"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.config_dir().join("decrypt-tables"))
        .ok_or_else(|| {
            DecryptError::ConfigInvalid("Could not determine the configuration directory".into())
        })
}

/// Derive the output path for a CSV input by inserting `suffix` before the
/// final extension: `archive/data.v2.csv` becomes `archive/data.v2_DECRYPTED.csv`.
pub fn decrypted_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let file_name = match input.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };

    input.with_file_name(file_name)
}

/// Find `*.csv` files under `dir`, sorted by path
///
/// Files that already carry the output suffix are skipped so a re-run does
/// not decrypt its own outputs.
pub fn discover_csv_files(dir: &Path, recursive: bool, suffix: &str) -> DecryptResult<Vec<PathBuf>> {
    let max_depth = if recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            DecryptError::SourceUnavailable(format!("Failed to scan {}: {}", dir.display(), e))
        })?;

        if !entry.file_type().is_file() || !is_csv(entry.path()) {
            continue;
        }
        if is_decrypted_output(entry.path(), suffix) {
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    Ok(files)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case("csv"))
        .unwrap_or(false)
}

fn is_decrypted_output(path: &Path, suffix: &str) -> bool {
    !suffix.is_empty()
        && path
            .file_stem()
            .map(|stem| stem.to_string_lossy().ends_with(suffix))
            .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = AppPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.settings_file(), temp_dir.path().join("settings.json"));
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        env::set_var("DECRYPT_TABLES_HOME", temp_dir.path());

        let paths = AppPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        env::remove_var("DECRYPT_TABLES_HOME");
    }

    #[test]
    fn test_output_path_simple() {
        assert_eq!(
            decrypted_output_path(Path::new("data.csv"), DEFAULT_OUTPUT_SUFFIX),
            PathBuf::from("data_DECRYPTED.csv")
        );
        assert_eq!(
            decrypted_output_path(Path::new("report.csv"), DEFAULT_OUTPUT_SUFFIX),
            PathBuf::from("report_DECRYPTED.csv")
        );
    }

    #[test]
    fn test_output_path_only_final_extension() {
        assert_eq!(
            decrypted_output_path(Path::new("archive/data.v2.csv"), DEFAULT_OUTPUT_SUFFIX),
            PathBuf::from("archive/data.v2_DECRYPTED.csv")
        );
    }

    #[test]
    fn test_output_path_without_extension() {
        assert_eq!(
            decrypted_output_path(Path::new("dir/data"), "_OUT"),
            PathBuf::from("dir/data_OUT")
        );
    }

    #[test]
    fn test_discover_top_level_only() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.csv"), "x").unwrap();
        fs::write(dir.path().join("a.CSV"), "x").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();
        fs::create_dir(dir.path().join("sub")).unwrap();
        fs::write(dir.path().join("sub").join("c.csv"), "x").unwrap();

        let files = discover_csv_files(dir.path(), false, DEFAULT_OUTPUT_SUFFIX).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.CSV", "b.csv"]);
    }

    #[test]
    fn test_discover_recursive() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "x").unwrap();
        fs::create_dir_all(dir.path().join("sub").join("deep")).unwrap();
        fs::write(dir.path().join("sub").join("deep").join("c.csv"), "x").unwrap();

        let files = discover_csv_files(dir.path(), true, DEFAULT_OUTPUT_SUFFIX).unwrap();
        assert_eq!(files.len(), 2);
        assert!(files[1].ends_with("sub/deep/c.csv"));
    }

    #[test]
    fn test_discover_skips_previous_outputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.csv"), "x").unwrap();
        fs::write(dir.path().join("a_DECRYPTED.csv"), "x").unwrap();

        let files = discover_csv_files(dir.path(), false, DEFAULT_OUTPUT_SUFFIX).unwrap();
        assert_eq!(files, vec![dir.path().join("a.csv")]);
    }
}

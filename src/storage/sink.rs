//! CSV output sink
//!
//! Writes comma-joined lines with no quoting or escaping, mirroring the
//! read path, so an untouched row comes out byte for byte.
//! Output goes to a temporary file next to the destination and is renamed
//! into place by [`TableWriter::finish`], so a unit that fails midway never
//! leaves a partial file at the destination.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{DecryptError, DecryptResult};

/// Writes the header and transformed rows of one unit
pub struct TableWriter {
    path: PathBuf,
    temp_path: PathBuf,
    writer: Option<BufWriter<File>>,
    header_written: bool,
    rows_written: usize,
}

impl TableWriter {
    /// Create the destination's temporary file, creating parent directories
    pub fn create(path: impl AsRef<Path>) -> DecryptResult<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                DecryptError::SinkWrite(format!(
                    "Failed to create directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = temp_path_for(&path);
        let file = File::create(&temp_path).map_err(|e| {
            DecryptError::SinkWrite(format!("Failed to create {}: {}", temp_path.display(), e))
        })?;

        Ok(Self {
            path,
            temp_path,
            writer: Some(BufWriter::new(file)),
            header_written: false,
            rows_written: 0,
        })
    }

    /// Write the header line; allowed exactly once, before any row
    ///
    /// An empty header (empty input) writes nothing.
    pub fn write_header(&mut self, header: &[String]) -> DecryptResult<()> {
        if self.header_written {
            return Err(DecryptError::SinkWrite("header already written".to_string()));
        }
        self.header_written = true;

        if header.is_empty() {
            return Ok(());
        }
        self.write_record(header)
    }

    /// Write one transformed row in source column order
    pub fn write_row(&mut self, row: &[String]) -> DecryptResult<()> {
        if !self.header_written {
            return Err(DecryptError::SinkWrite(
                "row written before header".to_string(),
            ));
        }
        self.write_record(row)?;
        self.rows_written += 1;
        Ok(())
    }

    /// Rows written so far, excluding the header
    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    /// Flush and move the output into place
    pub fn finish(mut self) -> DecryptResult<usize> {
        if let Some(mut writer) = self.writer.take() {
            writer
                .flush()
                .map_err(|e| DecryptError::SinkWrite(format!("Failed to flush output: {}", e)))?;
        }

        if let Err(e) = fs::rename(&self.temp_path, &self.path) {
            let _ = fs::remove_file(&self.temp_path);
            return Err(DecryptError::SinkWrite(format!(
                "Failed to write {}: {}",
                self.path.display(),
                e
            )));
        }

        Ok(self.rows_written)
    }

    fn write_record(&mut self, record: &[String]) -> DecryptResult<()> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| DecryptError::SinkWrite("output already closed".to_string()))?;

        let mut line = record.join(",");
        line.push('\n');
        writer.write_all(line.as_bytes()).map_err(|e| {
            DecryptError::SinkWrite(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl Drop for TableWriter {
    fn drop(&mut self) {
        // Unfinished: discard the temporary file.
        if self.writer.take().is_some() {
            let _ = fs::remove_file(&self.temp_path);
        }
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

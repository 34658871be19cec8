//! CSV file source
//!
//! Every line is split on the literal comma. Quotes are not interpreted, so
//! a field containing a comma shifts the columns after it. A blank line is a
//! row with one empty cell. Bytes that are not UTF-8 are replaced with
//! U+FFFD so a bad byte only affects its own cell.

use std::fs::File;
use std::io::{BufRead, BufReader, Split};
use std::path::{Path, PathBuf};

use crate::error::{DecryptError, DecryptResult};
use crate::models::{Header, Row};

use super::TabularSource;

/// Lazily reads rows from a CSV file; the first line is the header
pub struct CsvSource {
    path: PathBuf,
    header: Header,
    lines: Split<BufReader<File>>,
}

impl CsvSource {
    /// Open a CSV file and read its header line
    ///
    /// An empty file yields an empty header and no rows.
    pub fn open(path: impl AsRef<Path>) -> DecryptResult<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            DecryptError::SourceUnavailable(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let mut lines = BufReader::new(file).split(b'\n');

        let header = match lines.next() {
            Some(line) => split_line(&line.map_err(|e| read_error(path, e))?),
            None => Vec::new(),
        };

        Ok(Self {
            path: path.to_path_buf(),
            header,
            lines,
        })
    }
}

impl Iterator for CsvSource {
    type Item = DecryptResult<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        let line = self.lines.next()?;
        Some(
            line.map(|bytes| split_line(&bytes))
                .map_err(|e| read_error(&self.path, e)),
        )
    }
}

impl TabularSource for CsvSource {
    fn header(&self) -> &[String] {
        &self.header
    }
}

/// Split one raw line (without its `\n`) into cells
fn split_line(bytes: &[u8]) -> Row {
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes)
        .split(',')
        .map(str::to_string)
        .collect()
}

fn read_error(path: &Path, err: std::io::Error) -> DecryptError {
    DecryptError::SourceUnavailable(format!("Failed to read {}: {}", path.display(), err))
}

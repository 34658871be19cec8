//! Storage layer for decrypt-tables
//!
//! Tabular sources (CSV files, SQL result sets) and the CSV sink. Sources
//! are forward-only: reopening is the only way to restart one.

pub mod csv_source;
pub mod sink;
pub mod sql_source;

pub use csv_source::CsvSource;
pub use sink::TableWriter;
pub use sql_source::SqlSource;

use crate::error::DecryptResult;
use crate::models::{Row, UnitSource};

/// An ordered header followed by a lazy, finite sequence of rows
pub trait TabularSource: Iterator<Item = DecryptResult<Row>> {
    fn header(&self) -> &[String];
}

/// Open the source described by a unit
pub fn open_source(source: &UnitSource) -> DecryptResult<Box<dyn TabularSource>> {
    match source {
        UnitSource::CsvFile(path) => Ok(Box::new(CsvSource::open(path)?)),
        UnitSource::Database {
            connection, query, ..
        } => Ok(Box::new(SqlSource::open(connection, query)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DecryptError;
    use tempfile::TempDir;

    #[test]
    fn test_open_csv_source() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.csv");
        std::fs::write(&path, "x,y\n1,2\n").unwrap();

        let mut source = open_source(&UnitSource::CsvFile(path)).unwrap();
        assert_eq!(source.header(), ["x", "y"]);
        assert_eq!(source.next().unwrap().unwrap(), vec!["1", "2"]);
        assert!(source.next().is_none());
    }

    #[test]
    fn test_open_missing_csv_source() {
        let dir = TempDir::new().unwrap();
        let result = open_source(&UnitSource::CsvFile(dir.path().join("nope.csv")));
        assert!(matches!(result, Err(DecryptError::SourceUnavailable(_))));
    }
}

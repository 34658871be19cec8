//! Table units
//!
//! A unit is one CSV file or one database table processed end to end,
//! independently of every other unit in the batch.

use std::fmt;
use std::path::PathBuf;

/// Where a unit's rows come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitSource {
    /// A CSV file read with the naive comma split
    CsvFile(PathBuf),
    /// The result set of a query against a database
    Database {
        connection: String,
        table: String,
        query: String,
    },
}

/// One file or table to decrypt, plus where its output goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableUnit {
    pub source: UnitSource,
    pub output: PathBuf,
}

impl TableUnit {
    pub fn csv(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            source: UnitSource::CsvFile(input.into()),
            output: output.into(),
        }
    }

    pub fn database(
        connection: impl Into<String>,
        table: impl Into<String>,
        query: impl Into<String>,
        output: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source: UnitSource::Database {
                connection: connection.into(),
                table: table.into(),
                query: query.into(),
            },
            output: output.into(),
        }
    }

    /// The query this unit runs, if it is a database unit
    pub fn query(&self) -> Option<&str> {
        match &self.source {
            UnitSource::Database { query, .. } => Some(query),
            UnitSource::CsvFile(_) => None,
        }
    }
}

impl fmt::Display for TableUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            UnitSource::CsvFile(path) => write!(f, "file {}", path.display()),
            UnitSource::Database { table, .. } => write!(f, "table {}", table),
        }
    }
}

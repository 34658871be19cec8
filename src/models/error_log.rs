//! Per-unit error log
//!
//! Cell failures after the detection row are recorded here instead of
//! aborting anything. The log belongs to a single unit and is reported once
//! the unit finishes.

use std::fmt;

/// One failed cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    /// 1-based data row number (the detection row is row 1)
    pub row_number: usize,
    /// 1-based column index
    pub column_index: usize,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(row_number: usize, column_index: usize, message: impl Into<String>) -> Self {
        Self {
            row_number,
            column_index,
            message: message.into(),
        }
    }
}

impl fmt::Display for ErrorRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Row {}, Column {}: {}",
            self.row_number, self.column_index, self.message
        )
    }
}

/// Append-only accumulator of [`ErrorRecord`]s
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorLog {
    records: Vec<ErrorRecord>,
}

impl ErrorLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: ErrorRecord) {
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ErrorRecord>) {
        self.records.extend(records);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in the order they were appended (row, then column)
    pub fn iter(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.records.iter()
    }

    pub fn records(&self) -> &[ErrorRecord] {
        &self.records
    }
}

impl<'a> IntoIterator for &'a ErrorLog {
    type Item = &'a ErrorRecord;
    type IntoIter = std::slice::Iter<'a, ErrorRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

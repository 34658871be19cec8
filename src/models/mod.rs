//! Core data models for decrypt-tables
//!
//! Rows and headers are plain string vectors; the mask, error log and unit
//! descriptor carry the per-unit state of a run.

pub mod error_log;
pub mod mask;
pub mod unit;

pub use error_log::{ErrorLog, ErrorRecord};
pub use mask::ColumnMask;
pub use unit::{TableUnit, UnitSource};

/// One row of cells in source column order
pub type Row = Vec<String>;

/// Column names, written unchanged once per unit
pub type Header = Vec<String>;

//! Display formatting for terminal output
//!
//! Renders unit and batch reports as plain text for stdout.

pub mod report;

pub use report::{format_batch_summary, format_unit_report};

//! Report formatting for terminal output
//!
//! Each unit renders as one block; blocks are printed in input order and
//! followed by the batch summary.

use crate::models::{ColumnMask, UnitSource};
use crate::services::{BatchReport, UnitReport};

/// Format the report block for one unit
pub fn format_unit_report(report: &UnitReport) -> String {
    let unit = &report.unit;

    let mut output = format!("Processing {}\n", unit);
    if let UnitSource::Database { query, .. } = &unit.source {
        output.push_str(&format!("  Query: {}\n", query));
    }

    let outcome = match &report.result {
        Ok(outcome) => outcome,
        Err(e) => {
            output.push_str(&format!("An error occurred processing {}: {}\n", unit, e));
            return output;
        }
    };

    output.push_str(&format!(
        "  Encrypted columns: {}\n",
        format_mask(outcome.mask.as_ref())
    ));
    output.push_str(&format!("  Rows written: {}", outcome.rows_written));
    if outcome.ragged_rows > 0 {
        output.push_str(&format!(
            " ({} with a different width than the header)",
            outcome.ragged_rows
        ));
    }
    output.push('\n');

    if outcome.errors.is_empty() {
        output.push_str(&format!("No decryption errors encountered for {}.\n", unit));
    } else {
        output.push_str(&format!("Decryption errors for {}:\n", unit));
        for record in &outcome.errors {
            output.push_str(&format!("  {}\n", record));
        }
    }

    output.push_str(&format!("Output written to: {}\n", unit.output.display()));
    output
}

/// Format the one-line batch summary
pub fn format_batch_summary(report: &BatchReport) -> String {
    format!(
        "Processed {} {}: {} succeeded, {} failed, {} cell {}",
        report.units.len(),
        plural(report.units.len(), "unit", "units"),
        report.succeeded(),
        report.failed(),
        report.cell_errors(),
        plural(report.cell_errors(), "error", "errors"),
    )
}

fn format_mask(mask: Option<&ColumnMask>) -> String {
    match mask {
        None => "none (no data rows)".to_string(),
        Some(mask) if mask.encrypted_count() == 0 => "none".to_string(),
        Some(mask) => mask
            .encrypted_columns()
            .iter()
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(", "),
    }
}

fn plural<'a>(count: usize, one: &'a str, many: &'a str) -> &'a str {
    if count == 1 {
        one
    } else {
        many
    }
}

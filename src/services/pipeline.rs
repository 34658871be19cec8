//! Per-unit pipeline
//!
//! Header → detection row → remaining rows, all streamed from the source
//! into the sink in input order.

use tracing::{trace, warn};

use crate::crypto::CellDecryptor;
use crate::error::DecryptResult;
use crate::models::{ColumnMask, ErrorLog};
use crate::storage::{TabularSource, TableWriter};

use super::{detect, transform};

/// What a completed unit produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOutcome {
    /// Mask from the detection row; `None` when the source had no data rows
    pub mask: Option<ColumnMask>,
    /// Data rows written (header excluded)
    pub rows_written: usize,
    /// Rows whose width differed from the header
    pub ragged_rows: usize,
    pub errors: ErrorLog,
}

/// Stream one unit from `source` to `sink`
///
/// Cell failures are collected in the outcome. Only source and sink
/// failures end the unit early.
pub fn decrypt_table<S>(
    source: &mut S,
    sink: &mut TableWriter,
    cipher: &dyn CellDecryptor,
) -> DecryptResult<UnitOutcome>
where
    S: TabularSource + ?Sized,
{
    let header = source.header().to_vec();
    sink.write_header(&header)?;

    let mut outcome = UnitOutcome::default();

    let first_row = match source.next() {
        Some(row) => row?,
        None => return Ok(outcome),
    };
    check_width(&header, &first_row, 1, &mut outcome);

    let (mask, cells) = detect(&first_row, cipher);
    trace!(row = 1, mask = %mask, input = %first_row.join(","), output = %cells.join(","));
    sink.write_row(&cells)?;

    let mut row_number = 1;
    while let Some(row) = source.next() {
        let row = row?;
        row_number += 1;
        check_width(&header, &row, row_number, &mut outcome);

        let transformed = transform(&row, row_number, &mask, cipher);
        trace!(row = row_number, input = %row.join(","), output = %transformed.cells.join(","));
        sink.write_row(&transformed.cells)?;
        outcome.errors.extend(transformed.errors);
    }

    outcome.mask = Some(mask);
    outcome.rows_written = sink.rows_written();
    Ok(outcome)
}

fn check_width(header: &[String], row: &[String], row_number: usize, outcome: &mut UnitOutcome) {
    if !header.is_empty() && row.len() != header.len() {
        warn!(
            row = row_number,
            cells = row.len(),
            columns = header.len(),
            "row width differs from header"
        );
        outcome.ragged_rows += 1;
    }
}

//! Selective decryption of rows after the detection row
//!
//! Only masked columns are decrypted. A failed cell keeps its original
//! value and produces an [`ErrorRecord`]; it never reclassifies the column
//! or stops the row.

use tracing::debug;

use crate::crypto::CellDecryptor;
use crate::models::{ColumnMask, ErrorRecord, Row};

/// Result of transforming one row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedRow {
    pub cells: Row,
    pub errors: Vec<ErrorRecord>,
}

/// Decrypt the masked columns of `row`
///
/// `row_number` is the 1-based data row number used in error records.
/// Cells past the end of the mask pass through unchanged.
pub fn transform(
    row: &[String],
    row_number: usize,
    mask: &ColumnMask,
    cipher: &dyn CellDecryptor,
) -> TransformedRow {
    let mut errors = Vec::new();

    let cells = row
        .iter()
        .enumerate()
        .map(|(index, cell)| {
            if !mask.is_encrypted(index) {
                return cell.clone();
            }

            match cipher.decrypt_cell(cell) {
                Ok(plaintext) => plaintext,
                Err(e) => {
                    debug!(row = row_number, column = index + 1, reason = %e, "cell left as is");
                    errors.push(ErrorRecord::new(row_number, index + 1, e.to_string()));
                    cell.clone()
                }
            }
        })
        .collect();

    TransformedRow { cells, errors }
}

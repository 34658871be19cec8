//! Column detection
//!
//! No schema says which columns are encrypted. The first data row is
//! tried instead: every cell that decrypts marks its column as encrypted
//! for the rest of the unit, every cell that fails marks it as plaintext.
//! A detection failure is the signal, not an error, so nothing is logged.
//!
//! A column whose first value happens to be malformed is classified as
//! plaintext for the whole unit. That is a limit of the heuristic.

use tracing::debug;

use crate::crypto::CellDecryptor;
use crate::models::{ColumnMask, Row};

/// Probe the detection row, returning the mask and the transformed row
pub fn detect(first_row: &[String], cipher: &dyn CellDecryptor) -> (ColumnMask, Row) {
    let mut encrypted = Vec::with_capacity(first_row.len());
    let mut output = Vec::with_capacity(first_row.len());

    for (index, cell) in first_row.iter().enumerate() {
        match cipher.decrypt_cell(cell) {
            Ok(plaintext) => {
                encrypted.push(true);
                output.push(plaintext);
            }
            Err(e) => {
                debug!(column = index + 1, reason = %e, "column treated as plaintext");
                encrypted.push(false);
                output.push(cell.clone());
            }
        }
    }

    (ColumnMask::new(encrypted), output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecryptError, DecryptResult};

    struct PrefixCipher;

    impl CellDecryptor for PrefixCipher {
        fn decrypt_cell(&self, ciphertext: &str) -> DecryptResult<String> {
            ciphertext
                .strip_prefix("ENC:")
                .map(str::to_string)
                .ok_or_else(|| DecryptError::cell("not encrypted"))
        }
    }

    fn row(values: &[&str]) -> Row {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_detects_encrypted_columns() {
        let (mask, output) = detect(&row(&["1", "Alice", "ENC:123-45-6789"]), &PrefixCipher);
        assert_eq!(mask.as_slice(), &[false, false, true]);
        assert_eq!(output, row(&["1", "Alice", "123-45-6789"]));
    }

    #[test]
    fn test_mask_length_matches_row() {
        let first = row(&["ENC:a", "", "b", "ENC:", "c"]);
        let (mask, output) = detect(&first, &PrefixCipher);
        assert_eq!(mask.len(), first.len());
        assert_eq!(output.len(), first.len());
        assert_eq!(mask.as_slice(), &[true, false, false, true, false]);
        assert_eq!(output[3], "");
    }

    #[test]
    fn test_all_plaintext() {
        let (mask, output) = detect(&row(&["a", "b"]), &PrefixCipher);
        assert_eq!(mask.encrypted_count(), 0);
        assert_eq!(output, row(&["a", "b"]));
    }

    #[test]
    fn test_empty_row() {
        let (mask, output) = detect(&[], &PrefixCipher);
        assert!(mask.is_empty());
        assert!(output.is_empty());
    }
}

//! Column mask
//!
//! The per-column policy discovered from the detection row. Once built it is
//! never mutated; every later row of the same unit is read against it.

use std::fmt;

/// Which columns of a unit hold encrypted values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMask {
    encrypted: Vec<bool>,
}

impl ColumnMask {
    /// Build a mask from per-column detection results
    pub fn new(encrypted: Vec<bool>) -> Self {
        Self { encrypted }
    }

    /// Whether column `index` (0-based) should be decrypted
    ///
    /// Columns past the end of the mask are pass-through.
    pub fn is_encrypted(&self, index: usize) -> bool {
        self.encrypted.get(index).copied().unwrap_or(false)
    }

    /// Number of columns the mask was built from
    pub fn len(&self) -> usize {
        self.encrypted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encrypted.is_empty()
    }

    /// Number of columns classified as encrypted
    pub fn encrypted_count(&self) -> usize {
        self.encrypted.iter().filter(|e| **e).count()
    }

    /// 1-based indices of encrypted columns
    pub fn encrypted_columns(&self) -> Vec<usize> {
        self.encrypted
            .iter()
            .enumerate()
            .filter(|(_, e)| **e)
            .map(|(i, _)| i + 1)
            .collect()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.encrypted
    }
}

impl fmt::Display for ColumnMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flags: Vec<&str> = self
            .encrypted
            .iter()
            .map(|e| if *e { "E" } else { "-" })
            .collect();
        write!(f, "[{}]", flags.join(""))
    }
}

//! decrypt-tables - Selective column decryption for CSV files and SQL tables
//!
//! No schema says which columns of a table are encrypted. The first data row
//! is tried instead: columns whose value decrypts are treated as encrypted
//! for the rest of the table, all others pass through untouched. Cells that
//! fail later on are left as they are and reported by row and column, so one
//! bad value never costs a row, a table or a batch.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Settings, output naming and the database configuration payload
//! - `crypto`: Secret retrieval, key derivation and the cell cipher
//! - `error`: Custom error types
//! - `models`: Rows, column masks, error logs and table units
//! - `storage`: CSV and SQL sources, the CSV sink
//! - `services`: Detection, selective decryption and batch orchestration
//! - `display`: Terminal reports
//! - `cli`: Handlers for file mode and database mode
//!
//! # Example
//!
//! ```rust,ignore
//! use decrypt_tables::crypto::{AesGcmCellCipher, EnvSecretStore, KeyDerivationParams};
//! use decrypt_tables::models::TableUnit;
//! use decrypt_tables::services::DecryptService;
//!
//! let cipher = AesGcmCellCipher::from_store(&EnvSecretStore, "PII", &KeyDerivationParams::default())?;
//! let units = vec![TableUnit::csv("report.csv", "report_DECRYPTED.csv")];
//! let report = DecryptService::new(&cipher).run_batch(&units, |_| {})?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::DecryptError;

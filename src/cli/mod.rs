//! CLI command handlers
//!
//! This module bridges the parsed command line with the service layer:
//! file mode turns a path into CSV units, database mode turns a
//! configuration file into table units, and both run through the same
//! batch service.

pub mod database;
pub mod files;

pub use database::handle_config_command;
pub use files::{csv_units, handle_path_command};

use crate::config::Settings;
use crate::crypto::{AesGcmCellCipher, SecretStore};
use crate::display::{format_batch_summary, format_unit_report};
use crate::error::DecryptResult;
use crate::models::TableUnit;
use crate::services::{BatchReport, DecryptService};

/// Retrieve the secret and derive the run's cipher
fn build_cipher(settings: &Settings, store: &dyn SecretStore) -> DecryptResult<AesGcmCellCipher> {
    AesGcmCellCipher::from_store(store, &settings.secret_purpose, &settings.key_params)
}

/// Run the units and print each report followed by the batch summary
fn run_and_report(
    units: &[TableUnit],
    settings: &Settings,
    store: &dyn SecretStore,
    jobs: usize,
) -> DecryptResult<BatchReport> {
    let cipher = build_cipher(settings, store)?;
    let service = DecryptService::new(&cipher).with_jobs(jobs);

    let report = service.run_batch(units, |unit| println!("{}", format_unit_report(unit)))?;

    if report.units.len() > 1 {
        println!("{}", format_batch_summary(&report));
    }

    Ok(report)
}

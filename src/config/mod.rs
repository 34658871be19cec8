//! Configuration module for decrypt-tables
//!
//! This module provides:
//! - Settings directory resolution and CSV output naming
//! - Persistent tool settings
//! - The database mode configuration payload

pub mod database;
pub mod paths;
pub mod settings;

pub use database::{DatabaseConfig, RunConfig, TableConfig};
pub use paths::AppPaths;
pub use settings::Settings;

//! Service layer for decrypt-tables
//!
//! Column detection and selective decryption work on single rows; the
//! pipeline streams one unit through them and the batch service runs many
//! units with per-unit isolation.

pub mod batch;
pub mod detect;
pub mod pipeline;
pub mod transform;

pub use batch::{BatchReport, DecryptService, UnitReport};
pub use detect::detect;
pub use pipeline::{decrypt_table, UnitOutcome};
pub use transform::{transform, TransformedRow};

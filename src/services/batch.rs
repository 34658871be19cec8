//! Batch service
//!
//! Runs a list of units against one cipher. Each unit is isolated: a
//! failing unit is reported and the batch moves on to the next one.

use rayon::prelude::*;
use tracing::{error, info, info_span, warn};

use crate::crypto::CellDecryptor;
use crate::error::DecryptResult;
use crate::models::TableUnit;
use crate::storage::{open_source, TableWriter};

use super::pipeline::{decrypt_table, UnitOutcome};

/// Result of one unit
#[derive(Debug)]
pub struct UnitReport {
    pub unit: TableUnit,
    pub result: DecryptResult<UnitOutcome>,
}

impl UnitReport {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    /// Cell errors recorded for the unit (zero for a failed unit)
    pub fn cell_errors(&self) -> usize {
        self.result.as_ref().map(|o| o.errors.len()).unwrap_or(0)
    }
}

/// Reports for every unit of a batch, in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    pub units: Vec<UnitReport>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.units.iter().filter(|u| u.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.units.len() - self.succeeded()
    }

    pub fn cell_errors(&self) -> usize {
        self.units.iter().map(UnitReport::cell_errors).sum()
    }
}

/// Service for decrypting units
pub struct DecryptService<'a> {
    cipher: &'a dyn CellDecryptor,
    jobs: usize,
}

impl<'a> DecryptService<'a> {
    /// Create a service that processes one unit at a time
    pub fn new(cipher: &'a dyn CellDecryptor) -> Self {
        Self { cipher, jobs: 1 }
    }

    /// Process up to `jobs` units concurrently
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    /// Process a single unit, catching its failure into the report
    pub fn run_unit(&self, unit: &TableUnit) -> UnitReport {
        let span = info_span!("unit", unit = %unit);
        let _guard = span.enter();

        info!(output = %unit.output.display(), "processing");
        let result = self.process(unit);

        match &result {
            Ok(outcome) => info!(
                rows = outcome.rows_written,
                cell_errors = outcome.errors.len(),
                "finished"
            ),
            Err(e) if e.is_unit_failure() => warn!(error = %e, "unit failed"),
            Err(e) => error!(error = %e, "unit failed unexpectedly"),
        }

        UnitReport {
            unit: unit.clone(),
            result,
        }
    }

    /// Process every unit, calling `on_unit` for each report in input order
    ///
    /// With one job each report is delivered as soon as its unit finishes.
    /// With more, units run on a dedicated pool and reports are delivered
    /// once all of them are done.
    pub fn run_batch<F>(&self, units: &[TableUnit], mut on_unit: F) -> DecryptResult<BatchReport>
    where
        F: FnMut(&UnitReport),
    {
        let reports = if self.jobs <= 1 || units.len() <= 1 {
            let mut reports = Vec::with_capacity(units.len());
            for unit in units {
                let report = self.run_unit(unit);
                on_unit(&report);
                reports.push(report);
            }
            reports
        } else {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.jobs)
                .build()
                .map_err(|e| std::io::Error::other(format!("Failed to start workers: {}", e)))?;

            let reports: Vec<UnitReport> =
                pool.install(|| units.par_iter().map(|unit| self.run_unit(unit)).collect());
            reports.iter().for_each(&mut on_unit);
            reports
        };

        Ok(BatchReport { units: reports })
    }

    fn process(&self, unit: &TableUnit) -> DecryptResult<UnitOutcome> {
        // Source first so an unreachable source never leaves an output behind
        let mut source = open_source(&unit.source)?;
        let mut sink = TableWriter::create(&unit.output)?;

        let outcome = decrypt_table(source.as_mut(), &mut sink, self.cipher)?;
        sink.finish()?;
        Ok(outcome)
    }
}

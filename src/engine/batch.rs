//! Batch runner
//!
//! Applies the pass driver to every record in a collection. Records are
//! independent: no shared mutable state, no coordination, no ordering
//! requirement. The parallel path fans records out across a rayon pool and
//! fails fast on the first fatal error.

use rayon::prelude::*;

use crate::observability::{DeriveMetrics, ObservationScope};
use crate::record::ResponseRecord;
use crate::rules::RuleTable;

use super::driver::{EngineOptions, PassDriver};
use super::errors::EngineResult;

/// Options for one batch run.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Per-record engine options
    pub engine: EngineOptions,
    /// Resolve records across a thread pool
    pub parallel: bool,
}

/// Counts reported after a successful batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchSummary {
    pub records_processed: u64,
    pub rules_attempted: u64,
    pub variables_resolved: u64,
    pub variables_abandoned: u64,
}

/// Resolves a whole collection of records against one rule table.
pub struct BatchRunner<'a> {
    table: &'a RuleTable,
    options: BatchOptions,
}

impl<'a> BatchRunner<'a> {
    /// Creates a runner with default options.
    pub fn new(table: &'a RuleTable) -> Self {
        Self {
            table,
            options: BatchOptions::default(),
        }
    }

    /// Replaces the batch options.
    pub fn with_options(mut self, options: BatchOptions) -> Self {
        self.options = options;
        self
    }

    /// Resolves every record in place.
    ///
    /// A fatal error aborts the batch; records already augmented keep
    /// their derived values, but the error must be treated as failing the
    /// whole collection.
    pub fn run(&self, records: &mut [ResponseRecord]) -> EngineResult<BatchSummary> {
        let metrics = DeriveMetrics::new();
        let total = records.len().to_string();
        let scope = ObservationScope::begin("BATCH", &[("records", &total)]);

        let driver = PassDriver::new(self.table)
            .with_options(self.options.engine)
            .with_metrics(&metrics);

        let outcome = if self.options.parallel {
            records.par_iter_mut().try_for_each(|record| -> EngineResult<()> {
                driver.resolve(record)?;
                metrics.record_processed();
                Ok(())
            })
        } else {
            records.iter_mut().try_for_each(|record| -> EngineResult<()> {
                driver.resolve(record)?;
                metrics.record_processed();
                Ok(())
            })
        };

        outcome?;

        let snapshot = metrics.snapshot();
        scope.complete(&[
            ("records", &snapshot.records_processed.to_string()),
            ("resolved", &snapshot.variables_resolved.to_string()),
            ("abandoned", &snapshot.variables_abandoned.to_string()),
        ]);

        Ok(BatchSummary {
            records_processed: snapshot.records_processed,
            rules_attempted: snapshot.rules_attempted,
            variables_resolved: snapshot.variables_resolved,
            variables_abandoned: snapshot.variables_abandoned,
        })
    }
}

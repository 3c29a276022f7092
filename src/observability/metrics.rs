//! Derivation metrics
//!
//! Counters only, monotonic, thread-safe. Relaxed ordering is enough: the
//! counts are read once, after the batch joins.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for one batch run
#[derive(Debug, Default)]
pub struct DeriveMetrics {
    records_processed: AtomicU64,
    rules_attempted: AtomicU64,
    variables_resolved: AtomicU64,
    variables_abandoned: AtomicU64,
}

impl DeriveMetrics {
    /// Creates a registry with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// One record fully resolved.
    pub fn record_processed(&self) {
        self.records_processed.fetch_add(1, Ordering::Relaxed);
    }

    /// One rule evaluated against one record.
    pub fn rule_attempted(&self) {
        self.rules_attempted.fetch_add(1, Ordering::Relaxed);
    }

    /// One derived value written.
    pub fn variable_resolved(&self) {
        self.variables_resolved.fetch_add(1, Ordering::Relaxed);
    }

    /// One variable abandoned for a record's run.
    pub fn variable_abandoned(&self) {
        self.variables_abandoned.fetch_add(1, Ordering::Relaxed);
    }

    /// Reads all counters at once.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            records_processed: self.records_processed.load(Ordering::Relaxed),
            rules_attempted: self.rules_attempted.load(Ordering::Relaxed),
            variables_resolved: self.variables_resolved.load(Ordering::Relaxed),
            variables_abandoned: self.variables_abandoned.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of the counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub records_processed: u64,
    pub rules_attempted: u64,
    pub variables_resolved: u64,
    pub variables_abandoned: u64,
}

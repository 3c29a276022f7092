//! Observability subsystem for varcalc
//!
//! Structured logging, derivation events, and counter metrics.
//!
//! # Principles
//!
//! 1. Observability is read-only: it never influences resolution
//! 2. Output is deterministic: same run, same lines
//! 3. Logging is synchronous, one line per event, no buffering
//! 4. Per-rule trace lines exist only when the caller asks for them

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{DeriveMetrics, MetricsSnapshot};
pub use scope::ObservationScope;

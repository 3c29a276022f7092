//! Resolution engine for varcalc
//!
//! The pass driver resolves one record against the rule table; the batch
//! runner applies the driver to every record in a collection,
//! independently.
//!
//! # Resolution flow (strict order)
//!
//! 1. Collect the active variable set from the rule table
//! 2. For each pass, filter out variables abandoned in earlier passes
//! 3. For each active variable, try its candidate rules in table order
//! 4. Apply the five-way outcome contract to the record and the active set
//! 5. Stop at the all-done sentinel or when all passes complete
//!
//! # Invariants
//!
//! - A collected (raw) value is never altered, only new keys are written
//! - Once a variable reports data-not-found it is never attempted again
//! - A fatal error aborts the whole batch, never just one record

mod batch;
mod driver;
mod errors;

pub use batch::{BatchOptions, BatchRunner, BatchSummary};
pub use driver::{EngineOptions, PassDriver};
pub use errors::{EngineError, EngineResult};

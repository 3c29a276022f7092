//! Calculator subsystem: the rule operator library
//!
//! Every rule row selects one operator via its (action, detail) pair. An
//! operator reads source fields from a response record and reports exactly
//! one of five outcomes; the resolution driver turns that outcome into
//! record mutation and control flow.
//!
//! # Families
//!
//! - Conditional: 1-4 AND'd predicate slots, fill/else literals
//! - Aggregation/transform: sum, mean variants, product, subtraction,
//!   merge, count, recode, passthrough copy
//! - Markers: defer (retry next pass), all_done (stop the record)
//!
//! # Invariants
//!
//! - Operators are pure apart from reading the record
//! - A missing source field is an error value, never a panic
//! - An unmapped (action, detail) pair fails the whole batch, not the row

mod aggregate;
mod coerce;
mod conditional;
mod dispatch;
mod errors;
mod outcome;

pub use conditional::{ConditionalRule, PredicateKind};
pub use dispatch::{dispatch, Operator};
pub use errors::{EvalError, EvalResult};
pub use outcome::Outcome;

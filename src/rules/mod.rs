//! Rule table subsystem for varcalc
//!
//! A rule table is an ordered sequence of rows, each describing one way to
//! attempt computing one derived variable. Rows sharing a variable and a
//! pass number form an ordered candidate list; the first candidate that
//! resolves wins.
//!
//! # Invariants
//!
//! - Rows are immutable once loaded
//! - Candidate order is table order, always
//! - Variable names are collected in first-seen order, empty names excluded

mod errors;
mod loader;
mod row;
mod table;

pub use errors::{TableError, TableResult};
pub use loader::load_rules;
pub use row::RuleRow;
pub use table::RuleTable;

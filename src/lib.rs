//! varcalc - A strict, deterministic derived-variable calculator for survey responses
//!
//! A rule table describes how each derived variable may be computed from
//! collected or previously derived values. The engine resolves one record
//! at a time over a fixed number of passes; a batch runner fans that out
//! over a whole collection of responses.

pub mod calc;
pub mod cli;
pub mod engine;
pub mod observability;
pub mod record;
pub mod rules;

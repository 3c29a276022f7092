//! Engine errors
//!
//! Both variants are batch-fatal: a rule table that maps to no operator is
//! a configuration defect, and an operator that demands a number the data
//! cannot supply is a data-quality defect. Neither may be swallowed.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Fatal derivation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// No operator is mapped for a rule's action/detail pair.
    #[error(
        "No calculator mapped for action '{action}', detail '{detail}' \
         (variable '{variable}', pass {pass_number})"
    )]
    Configuration {
        action: String,
        detail: String,
        variable: String,
        pass_number: u32,
    },

    /// An operator required a numeric operand the record could not supply.
    #[error(
        "Non-numeric value '{value}' in field '{field}' while deriving \
         '{variable}' (pass {pass_number})"
    )]
    Numeric {
        field: String,
        value: String,
        variable: String,
        pass_number: u32,
    },
}

//! Evaluation errors
//!
//! Two of these are fatal for the whole batch (unmapped calculator,
//! non-numeric operand where an operator demands one); a missing field is
//! recoverable and is converted by the driver into the data-not-found
//! outcome for the variable at hand.

use thiserror::Error;

/// Result type for rule evaluation
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while evaluating one rule
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A required source field is absent from the response record.
    #[error("Field '{0}' does not exist in the response")]
    FieldMissing(String),

    /// No operator is mapped for the rule's action/detail pair. A rule
    /// table defect, never a data defect.
    #[error("No calculator mapped for action '{action}', detail '{detail}'")]
    UnmappedCalculator { action: String, detail: String },

    /// An operator demanded a numeric operand the record could not supply.
    #[error("Non-numeric value for field '{field}': '{value}'")]
    NonNumeric { field: String, value: String },
}

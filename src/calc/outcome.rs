//! Post-evaluation outcome contract
//!
//! Evaluating one rule against one record yields exactly one of five kinds.
//! Only `ConditionsNotMet` keeps the driver inside the candidate-rule loop;
//! every other kind breaks out of it.

use serde_json::Value;

/// Result of evaluating one rule against one response record.
///
/// A pure control signal between operator and driver; never persisted.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Condition satisfied; the value is authoritative for the rule's
    /// variable and must be written to the record.
    ValueResolved(Value),

    /// Source data present but the predicate failed with no usable
    /// fallback; try the next candidate rule in the same pass.
    ConditionsNotMet,

    /// A required source field is absent and can never appear; abandon the
    /// variable for the remainder of the run.
    DataNotFound,

    /// The source field may be produced by a later pass; retry the variable
    /// next pass from its first candidate.
    DeferToNextPass,

    /// Sentinel: no further variables are attempted for this record.
    AllDone,
}

impl Outcome {
    /// Short name for trace lines.
    pub fn name(&self) -> &'static str {
        match self {
            Outcome::ValueResolved(_) => "value_resolved",
            Outcome::ConditionsNotMet => "conditions_not_met",
            Outcome::DataNotFound => "data_not_found",
            Outcome::DeferToNextPass => "defer_to_next_pass",
            Outcome::AllDone => "all_done",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_outcome_names() {
        assert_eq!(Outcome::ValueResolved(json!(1)).name(), "value_resolved");
        assert_eq!(Outcome::ConditionsNotMet.name(), "conditions_not_met");
        assert_eq!(Outcome::DataNotFound.name(), "data_not_found");
        assert_eq!(Outcome::DeferToNextPass.name(), "defer_to_next_pass");
        assert_eq!(Outcome::AllDone.name(), "all_done");
    }
}

//! Derivation lifecycle events
//!
//! Every observable event has a typed name; free-form event strings do not
//! appear outside this module.

/// Observable events during derivation, all trace level. Batch lifecycle
/// events are produced by the observation scope instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    /// One rule was attempted against one record
    RuleAttempt,
    /// A derived value was written to a record
    ValueResolved,
    /// A variable was abandoned for the rest of a record's run
    VariableAbandoned,
    /// The all-done sentinel stopped a record
    RecordHalted,
}

impl Event {
    /// Event name as logged
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::RuleAttempt => "RULE_ATTEMPT",
            Event::ValueResolved => "VALUE_RESOLVED",
            Event::VariableAbandoned => "VARIABLE_ABANDONED",
            Event::RecordHalted => "RECORD_HALTED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::RuleAttempt.as_str(), "RULE_ATTEMPT");
        assert_eq!(Event::ValueResolved.as_str(), "VALUE_RESOLVED");
        assert_eq!(Event::VariableAbandoned.as_str(), "VARIABLE_ABANDONED");
        assert_eq!(Event::RecordHalted.as_str(), "RECORD_HALTED");
    }
}

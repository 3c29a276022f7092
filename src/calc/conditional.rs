//! Conditional rule evaluation
//!
//! A conditional rule holds 1-4 predicate slots. Slot `i` reads the response
//! field named by source slot `i` and compares it with that slot's literal
//! operand. All slots must hold (logical AND; no OR or NOT form exists).
//!
//! Evaluation order is strict:
//! 1. Read every slot's response value; a missing field stops evaluation
//! 2. Verify numeric predicates have numeric operands on both sides; a
//!    structurally wrong comparison yields data-not-found because the rule
//!    can never hold for this record
//! 3. Test the conjunction: emit `fill_with_this` on success, resolve the
//!    fallback literal otherwise

use serde_json::Value;

use crate::record::ResponseRecord;
use crate::rules::RuleRow;

use super::coerce::{is_null_like, numeric, split_list, text};
use super::errors::{EvalError, EvalResult};
use super::outcome::Outcome;

/// Predicate applied to one source slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PredicateKind {
    /// Numeric equality
    Equal,
    /// Exact string match, no coercion
    EqualString,
    GreaterThan,
    GreaterThanEqual,
    LessThan,
    LessThanEqual,
    /// Membership in a comma-split literal set, compared as strings
    IsIn,
    /// Response value is absent-like (null or empty string)
    IsNull,
    /// Inclusive range between the slot's two literals
    BetweenIncluding,
}

impl PredicateKind {
    /// Parses one predicate name as it appears in a rule's detail column.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "equal" => Some(Self::Equal),
            "equal_string" => Some(Self::EqualString),
            "greater_than" => Some(Self::GreaterThan),
            "greater_than_equal" => Some(Self::GreaterThanEqual),
            "less_than" => Some(Self::LessThan),
            "less_than_equal" => Some(Self::LessThanEqual),
            "is_in" => Some(Self::IsIn),
            "is_null" => Some(Self::IsNull),
            "between_including" => Some(Self::BetweenIncluding),
            _ => None,
        }
    }

    /// Predicate name for trace lines.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Equal => "equal",
            Self::EqualString => "equal_string",
            Self::GreaterThan => "greater_than",
            Self::GreaterThanEqual => "greater_than_equal",
            Self::LessThan => "less_than",
            Self::LessThanEqual => "less_than_equal",
            Self::IsIn => "is_in",
            Self::IsNull => "is_null",
            Self::BetweenIncluding => "between_including",
        }
    }

    /// True for predicates that compare as floating-point numbers and so
    /// require every operand under comparison to be numeric.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Self::Equal
                | Self::GreaterThan
                | Self::GreaterThanEqual
                | Self::LessThan
                | Self::LessThanEqual
                | Self::BetweenIncluding
        )
    }
}

/// A conditional rule evaluator: 1-4 AND'd predicate slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    predicates: Vec<PredicateKind>,
}

impl ConditionalRule {
    /// Creates an evaluator for the given predicate slots (a, b, c, d order).
    pub fn new(predicates: Vec<PredicateKind>) -> Self {
        Self { predicates }
    }

    /// Number of predicate slots.
    pub fn arity(&self) -> usize {
        self.predicates.len()
    }

    /// Evaluates the conjunction against one record.
    pub fn evaluate(&self, rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
        // Phase 1: every slot's response value must exist before anything
        // is compared.
        let mut actuals: Vec<&Value> = Vec::with_capacity(self.predicates.len());
        for index in 0..self.predicates.len() {
            let key = rule.slot_key(index).unwrap_or("");
            let actual = record
                .get(key)
                .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
            actuals.push(actual);
        }

        // Phase 2: numeric gate over all slots at once.
        for (index, predicate) in self.predicates.iter().enumerate() {
            if !Self::operands_numeric(*predicate, index, actuals[index], rule) {
                return Ok(Outcome::DataNotFound);
            }
        }

        // Phase 3: the conjunction itself.
        for (index, predicate) in self.predicates.iter().enumerate() {
            if !Self::holds(*predicate, index, actuals[index], rule) {
                return Ok(resolve_else(rule));
            }
        }
        Ok(resolve_fill(rule))
    }

    /// True when every operand a numeric predicate will compare is numeric.
    fn operands_numeric(
        predicate: PredicateKind,
        index: usize,
        actual: &Value,
        rule: &RuleRow,
    ) -> bool {
        if !predicate.is_numeric() {
            return true;
        }
        if numeric(actual).is_none() {
            return false;
        }
        let literal_numeric = |value: Option<&Value>| value.and_then(numeric).is_some();
        match predicate {
            PredicateKind::BetweenIncluding => {
                literal_numeric(rule.slot_value(index)) && literal_numeric(rule.value_a2.as_ref())
            }
            _ => literal_numeric(rule.slot_value(index)),
        }
    }

    /// Tests one predicate slot. Numeric operands are guaranteed by the
    /// earlier gate.
    fn holds(predicate: PredicateKind, index: usize, actual: &Value, rule: &RuleRow) -> bool {
        let literal = rule.slot_value(index).unwrap_or(&Value::Null);
        match predicate {
            PredicateKind::Equal => as_f64(actual) == as_f64(literal),
            PredicateKind::EqualString => text(actual) == text(literal),
            PredicateKind::GreaterThan => as_f64(actual) > as_f64(literal),
            PredicateKind::GreaterThanEqual => as_f64(actual) >= as_f64(literal),
            PredicateKind::LessThan => as_f64(actual) < as_f64(literal),
            PredicateKind::LessThanEqual => as_f64(actual) <= as_f64(literal),
            PredicateKind::IsIn => {
                let needle = text(actual);
                split_list(&text(literal)).contains(&needle.as_str())
            }
            PredicateKind::IsNull => is_null_like(actual),
            PredicateKind::BetweenIncluding => {
                let low = rule
                    .slot_value(index)
                    .and_then(numeric)
                    .unwrap_or(f64::NAN);
                let high = rule.value_a2.as_ref().and_then(numeric).unwrap_or(f64::NAN);
                let mid = as_f64(actual);
                low <= mid && mid <= high
            }
        }
    }
}

fn as_f64(value: &Value) -> f64 {
    numeric(value).unwrap_or(f64::NAN)
}

/// Success path: the rule's fill literal is authoritative.
fn resolve_fill(rule: &RuleRow) -> Outcome {
    Outcome::ValueResolved(rule.fill_with_this.clone().unwrap_or(Value::Null))
}

/// Fallback path: the `else` literal is emitted only when it is present
/// and NOT numeric-parseable; a numeric-looking fallback means the rule is
/// treated as unmet instead.
fn resolve_else(rule: &RuleRow) -> Outcome {
    match &rule.else_value {
        Some(value) if !value.is_null() && numeric(value).is_none() => {
            Outcome::ValueResolved(value.clone())
        }
        _ => Outcome::ConditionsNotMet,
    }
}

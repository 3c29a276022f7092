//! Rule dispatcher: maps an (action, detail) pair to an operator
//!
//! Dispatch is a pure total function. A pair with no matching operator maps
//! to the unmapped marker, whose evaluation raises the configuration error
//! that aborts the batch; dispatch itself never fails.

use crate::record::ResponseRecord;
use crate::rules::RuleRow;

use super::aggregate;
use super::conditional::{ConditionalRule, PredicateKind};
use super::errors::{EvalError, EvalResult};
use super::outcome::Outcome;

/// The closed set of rule operators.
#[derive(Debug, Clone, PartialEq)]
pub enum Operator {
    /// 1-4 AND'd predicate slots with fill/else literals
    Conditional(ConditionalRule),
    Sum,
    Subtraction,
    Mean,
    /// Mean tolerating up to N-1 missing fields
    MeanTolerant(usize),
    MeanSkipNa,
    Merge,
    Product,
    Count,
    Recode,
    /// Passthrough identity copy (absent action)
    Copy,
    /// Always defers the variable to the next pass
    Defer,
    /// Terminal sentinel: stop the whole record
    AllDone,
    /// Fatal-null: evaluation raises a configuration error
    Unmapped,
}

impl Operator {
    /// Operator name for trace lines.
    pub fn name(&self) -> &'static str {
        match self {
            Operator::Conditional(c) if c.arity() == 1 => "conditional",
            Operator::Conditional(_) => "multi_conditional",
            Operator::Sum => "sum",
            Operator::Subtraction => "subtraction",
            Operator::Mean => "mean",
            Operator::MeanTolerant(_) => "mean_tolerant",
            Operator::MeanSkipNa => "mean_skipna",
            Operator::Merge => "merge",
            Operator::Product => "product",
            Operator::Count => "count",
            Operator::Recode => "recode",
            Operator::Copy => "copy",
            Operator::Defer => "defer",
            Operator::AllDone => "all_done",
            Operator::Unmapped => "unmapped",
        }
    }

    /// Evaluates the rule against one record.
    pub fn evaluate(&self, rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
        match self {
            Operator::Conditional(cond) => cond.evaluate(rule, record),
            Operator::Sum => aggregate::sum(rule, record),
            Operator::Subtraction => aggregate::subtraction(rule, record),
            Operator::Mean => aggregate::mean(rule, record),
            Operator::MeanTolerant(max_missing) => {
                aggregate::mean_tolerant(rule, record, *max_missing)
            }
            Operator::MeanSkipNa => aggregate::mean_skip_na(rule, record),
            Operator::Merge => aggregate::merge(rule, record),
            Operator::Product => aggregate::product(rule, record),
            Operator::Count => aggregate::count(rule, record),
            Operator::Recode => aggregate::recode(rule, record),
            Operator::Copy => aggregate::copy(rule, record),
            Operator::Defer => Ok(Outcome::DeferToNextPass),
            Operator::AllDone => Ok(Outcome::AllDone),
            Operator::Unmapped => Err(EvalError::UnmappedCalculator {
                action: rule.action_str().to_string(),
                detail: rule.detail_str().to_string(),
            }),
        }
    }
}

/// Selects the operator for one rule row.
pub fn dispatch(rule: &RuleRow) -> Operator {
    let action = rule.action_str();
    if action.is_empty() {
        return Operator::Copy;
    }

    match action {
        "recode" | "recode_2" | "recode_3" => Operator::Recode,
        "conditional" | "conditional_2" | "conditional_3" => {
            conditional_operator(rule.detail_str(), 1, 1)
        }
        "multi_conditional" | "multi_conditional_and" | "multi_conditional_and_2"
        | "multi_conditional_and_3" => conditional_operator(rule.detail_str(), 2, 4),
        "sum" | "sum_2" | "sum_3" | "sum_4" => Operator::Sum,
        "subtraction" => Operator::Subtraction,
        "mean" => Operator::Mean,
        "mean_2_or_more" => Operator::MeanTolerant(2),
        "mean_3_or_more" => Operator::MeanTolerant(3),
        "mean_4_or_more" => Operator::MeanTolerant(4),
        "mean_5_or_more" => Operator::MeanTolerant(5),
        "mean_skipna" => Operator::MeanSkipNa,
        "merge" => Operator::Merge,
        "product" => Operator::Product,
        "count" => Operator::Count,
        "defer" => Operator::Defer,
        "all_done" => Operator::AllDone,
        _ => Operator::Unmapped,
    }
}

/// Parses a comma-joined predicate detail into a conditional operator.
///
/// The inclusive-range predicate is only valid on slot a, the one slot
/// carrying two literals. Out-of-arity or unknown details map to the
/// unmapped marker.
fn conditional_operator(detail: &str, min_arity: usize, max_arity: usize) -> Operator {
    let predicates: Option<Vec<PredicateKind>> =
        detail.split(',').map(PredicateKind::parse).collect();

    match predicates {
        Some(slots)
            if (min_arity..=max_arity).contains(&slots.len())
                && !slots[1..].contains(&PredicateKind::BetweenIncluding) =>
        {
            Operator::Conditional(ConditionalRule::new(slots))
        }
        _ => Operator::Unmapped,
    }
}

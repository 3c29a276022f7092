//! Aggregation and transform operators
//!
//! These operators compute a value directly from response fields; none of
//! them consult `fill_with_this` or the fallback literal. Tolerance for
//! missing or malformed input varies per operator and is part of each
//! operator's contract, not an accident: sum skips missing fields, mean
//! does not, subtraction and recode fail the batch on non-numeric input.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::record::ResponseRecord;
use crate::rules::RuleRow;

use super::coerce::{integer, number_list, numeric, text};
use super::errors::{EvalError, EvalResult};
use super::outcome::Outcome;

/// Sentinel marking a question as not applicable to the subject.
const NOT_APPLICABLE: f64 = -99.0;

/// Sum over a comma-separated field list in slot a (duplicates removed).
///
/// Missing fields are skipped. Each present value is parsed as a number or
/// a list of numbers. No values at all yields an empty string, not zero.
pub fn sum(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let keys: BTreeSet<&str> = field_list(rule)?.into_iter().collect();

    let mut values: Vec<f64> = Vec::new();
    for key in keys {
        let Some(value) = record.get(key) else {
            continue;
        };
        let members = number_list(value).map_err(|offender| EvalError::NonNumeric {
            field: key.to_string(),
            value: offender,
        })?;
        values.extend(members);
    }

    if values.is_empty() {
        return Ok(resolved_empty());
    }
    Ok(resolved_number(values.iter().sum()))
}

/// Mean over a comma-separated field list in slot a.
///
/// Every listed field must exist and convert to an integer; a missing field
/// abandons the variable, a non-integer value fails the batch.
pub fn mean(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let keys = field_list(rule)?;

    let mut values: Vec<i64> = Vec::new();
    for key in &keys {
        let value = record
            .get(key)
            .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
        let number = integer(value).ok_or_else(|| EvalError::NonNumeric {
            field: key.to_string(),
            value: text(value),
        })?;
        values.push(number);
    }

    Ok(resolved_number(
        values.iter().sum::<i64>() as f64 / values.len() as f64,
    ))
}

/// Mean that tolerates missing fields up to a threshold.
///
/// Fields that are absent or null are skipped; once `max_missing` or more
/// are missing the result is empty. Present values must convert to
/// integers.
pub fn mean_tolerant(
    rule: &RuleRow,
    record: &ResponseRecord,
    max_missing: usize,
) -> EvalResult<Outcome> {
    let keys = field_list(rule)?;
    let expected = keys.len();

    let mut values: Vec<i64> = Vec::new();
    for key in &keys {
        let Some(value) = record.get(key) else {
            continue;
        };
        if value.is_null() {
            continue;
        }
        let number = integer(value).ok_or_else(|| EvalError::NonNumeric {
            field: key.to_string(),
            value: text(value),
        })?;
        values.push(number);
    }

    if expected - values.len() >= max_missing || values.is_empty() {
        return Ok(resolved_empty());
    }
    Ok(resolved_number(
        values.iter().sum::<i64>() as f64 / values.len() as f64,
    ))
}

/// Mean that skips the not-applicable sentinel (-99).
///
/// Any non-numeric field value resolves the whole rule to an empty result
/// immediately; so does an all-skipped input.
pub fn mean_skip_na(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let keys = field_list(rule)?;

    let mut values: Vec<f64> = Vec::new();
    for key in &keys {
        let value = record
            .get(key)
            .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
        match numeric(value) {
            None => return Ok(resolved_empty()),
            Some(n) if n == NOT_APPLICABLE => continue,
            Some(n) => values.push(n),
        }
    }

    if values.is_empty() {
        return Ok(resolved_empty());
    }
    Ok(resolved_number(
        values.iter().sum::<f64>() / values.len() as f64,
    ))
}

/// Multiplies the response value at slot a's field by slot a's literal.
///
/// Either operand failing to parse yields an empty result.
pub fn product(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key = slot_a_key(rule)?;
    let actual = record
        .get(key)
        .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
    let factor = rule.value_a.as_ref().and_then(numeric);

    match (numeric(actual), factor) {
        (Some(a), Some(b)) => Ok(resolved_number(a * b)),
        _ => Ok(resolved_empty()),
    }
}

/// Subtracts the response value at slot b's field from slot a's.
///
/// Both operands must parse as numbers; failure is fatal for the batch.
pub fn subtraction(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key_a = slot_a_key(rule)?;
    let key_b = rule
        .key_b
        .as_deref()
        .ok_or_else(|| EvalError::FieldMissing("survey_id_b".to_string()))?;

    let left = require_numeric(record, key_a)?;
    let right = require_numeric(record, key_b)?;
    Ok(resolved_number(left - right))
}

/// Concatenates the text forms of slot a's and slot b's response values.
pub fn merge(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key_a = slot_a_key(rule)?;
    let key_b = rule
        .key_b
        .as_deref()
        .ok_or_else(|| EvalError::FieldMissing("survey_id_b".to_string()))?;

    let left = record
        .get(key_a)
        .ok_or_else(|| EvalError::FieldMissing(key_a.to_string()))?;
    let right = record
        .get(key_b)
        .ok_or_else(|| EvalError::FieldMissing(key_b.to_string()))?;

    Ok(Outcome::ValueResolved(Value::String(format!(
        "{}{}",
        text(left),
        text(right)
    ))))
}

/// Counts the comma-separated members of slot a's response value.
///
/// A null value has nothing to split and counts as zero; arrays count
/// their elements directly.
pub fn count(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key = slot_a_key(rule)?;
    let value = record
        .get(key)
        .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;

    let total = match value {
        Value::Null => 0,
        Value::Array(items) => items.len(),
        other => text(other).split(',').count(),
    };
    Ok(resolved_number(total as f64))
}

/// Reverse-codes a 1-5 response: `6 - value`.
///
/// A non-integer source is an explicit failure.
pub fn recode(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key = slot_a_key(rule)?;
    let value = record
        .get(key)
        .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;

    let number = integer(value).ok_or_else(|| EvalError::NonNumeric {
        field: key.to_string(),
        value: text(value),
    })?;
    Ok(resolved_number((6 - number) as f64))
}

/// Passthrough identity: the response value at slot a, stringified.
pub fn copy(rule: &RuleRow, record: &ResponseRecord) -> EvalResult<Outcome> {
    let key = slot_a_key(rule)?;
    let value = record
        .get(key)
        .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
    Ok(Outcome::ValueResolved(Value::String(text(value))))
}

/// Slot a's field name, required by every operator in this family.
fn slot_a_key(rule: &RuleRow) -> EvalResult<&str> {
    rule.key_a
        .as_deref()
        .ok_or_else(|| EvalError::FieldMissing("survey_id_a".to_string()))
}

/// Slot a's comma-separated field names, in column order.
fn field_list(rule: &RuleRow) -> EvalResult<Vec<&str>> {
    Ok(slot_a_key(rule)?.split(',').collect())
}

fn require_numeric(record: &ResponseRecord, key: &str) -> EvalResult<f64> {
    let value = record
        .get(key)
        .ok_or_else(|| EvalError::FieldMissing(key.to_string()))?;
    numeric(value).ok_or_else(|| EvalError::NonNumeric {
        field: key.to_string(),
        value: text(value),
    })
}

fn resolved_number(n: f64) -> Outcome {
    let value = serde_json::Number::from_f64(n)
        .map(Value::Number)
        .unwrap_or(Value::Null);
    Outcome::ValueResolved(value)
}

fn resolved_empty() -> Outcome {
    Outcome::ValueResolved(Value::String(String::new()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(pairs: &[(&str, Value)]) -> ResponseRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn sum_rule(keys: &str) -> RuleRow {
        RuleRow::new("total", 0, "sum", "").source_a(keys)
    }

    #[test]
    fn test_sum_adds_all_listed_fields() {
        let rec = record(&[("q1", json!("3")), ("q2", json!(4))]);
        let outcome = sum(&sum_rule("q1,q2"), &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(7.0)));
    }

    #[test]
    fn test_sum_skips_missing_fields() {
        let rec = record(&[("q2", json!(4))]);
        let outcome = sum(&sum_rule("q1,q2"), &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(4.0)));
    }

    #[test]
    fn test_sum_empty_input_is_empty_string() {
        let outcome = sum(&sum_rule("q1,q2"), &record(&[])).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("")));
    }

    #[test]
    fn test_sum_deduplicates_fields() {
        let rec = record(&[("q1", json!(3))]);
        let outcome = sum(&sum_rule("q1,q1"), &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(3.0)));
    }

    #[test]
    fn test_sum_flattens_list_values() {
        let rec = record(&[("q1", json!("[1, 2]")), ("q2", json!(3))]);
        let outcome = sum(&sum_rule("q1,q2"), &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(6.0)));
    }

    #[test]
    fn test_sum_non_numeric_present_value_is_fatal() {
        let rec = record(&[("q1", json!("abc"))]);
        let err = sum(&sum_rule("q1"), &rec).unwrap_err();
        assert!(matches!(err, EvalError::NonNumeric { .. }));
    }

    #[test]
    fn test_mean_requires_every_field() {
        let rule = RuleRow::new("avg", 0, "mean", "").source_a("q1,q2");
        let err = mean(&rule, &record(&[("q1", json!(2))])).unwrap_err();
        assert_eq!(err, EvalError::FieldMissing("q2".to_string()));
    }

    #[test]
    fn test_mean_of_integers() {
        let rule = RuleRow::new("avg", 0, "mean", "").source_a("q1,q2");
        let rec = record(&[("q1", json!(2)), ("q2", json!("4"))]);
        let outcome = mean(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(3.0)));
    }

    #[test]
    fn test_mean_non_integer_is_fatal() {
        let rule = RuleRow::new("avg", 0, "mean", "").source_a("q1");
        let err = mean(&rule, &record(&[("q1", json!("x"))])).unwrap_err();
        assert!(matches!(err, EvalError::NonNumeric { .. }));
    }

    #[test]
    fn test_mean_tolerant_below_threshold() {
        let rule = RuleRow::new("avg", 0, "mean_2_or_more", "").source_a("q1,q2,q3");
        let rec = record(&[("q1", json!(2)), ("q2", json!(4))]);
        let outcome = mean_tolerant(&rule, &rec, 2).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(3.0)));
    }

    #[test]
    fn test_mean_tolerant_at_threshold_is_empty() {
        let rule = RuleRow::new("avg", 0, "mean_2_or_more", "").source_a("q1,q2,q3");
        let rec = record(&[("q1", json!(2))]);
        let outcome = mean_tolerant(&rule, &rec, 2).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("")));
    }

    #[test]
    fn test_mean_tolerant_null_counts_as_missing() {
        let rule = RuleRow::new("avg", 0, "mean_3_or_more", "").source_a("q1,q2,q3");
        let rec = record(&[("q1", json!(6)), ("q2", json!(null)), ("q3", json!(null))]);
        let outcome = mean_tolerant(&rule, &rec, 3).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(6.0)));
    }

    #[test]
    fn test_mean_skip_na_drops_sentinel() {
        let rule = RuleRow::new("avg", 0, "mean_skipna", "").source_a("q1,q2,q3");
        let rec = record(&[("q1", json!(2)), ("q2", json!(-99)), ("q3", json!(4))]);
        let outcome = mean_skip_na(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(3.0)));
    }

    #[test]
    fn test_mean_skip_na_non_numeric_resolves_empty() {
        let rule = RuleRow::new("avg", 0, "mean_skipna", "").source_a("q1,q2");
        let rec = record(&[("q1", json!("n/a")), ("q2", json!(4))]);
        let outcome = mean_skip_na(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("")));
    }

    #[test]
    fn test_mean_skip_na_all_skipped_is_empty() {
        let rule = RuleRow::new("avg", 0, "mean_skipna", "").source_a("q1");
        let rec = record(&[("q1", json!(-99))]);
        let outcome = mean_skip_na(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("")));
    }

    #[test]
    fn test_product_multiplies_by_literal() {
        let rule = RuleRow::new("weighted", 0, "product", "").slot_a("q1", json!(2.5));
        let rec = record(&[("q1", json!(4))]);
        let outcome = product(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(10.0)));
    }

    #[test]
    fn test_product_non_numeric_is_empty() {
        let rule = RuleRow::new("weighted", 0, "product", "").slot_a("q1", json!(2.5));
        let rec = record(&[("q1", json!("x"))]);
        let outcome = product(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("")));
    }

    #[test]
    fn test_subtraction() {
        let rule = RuleRow::new("delta", 0, "subtraction", "")
            .source_a("after")
            .slot_b("before", Value::Null);
        let rec = record(&[("after", json!(10)), ("before", json!("4"))]);
        let outcome = subtraction(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(6.0)));
    }

    #[test]
    fn test_subtraction_non_numeric_is_fatal() {
        let rule = RuleRow::new("delta", 0, "subtraction", "")
            .source_a("after")
            .slot_b("before", Value::Null);
        let rec = record(&[("after", json!("soon")), ("before", json!(4))]);
        let err = subtraction(&rule, &rec).unwrap_err();
        assert_eq!(
            err,
            EvalError::NonNumeric {
                field: "after".to_string(),
                value: "soon".to_string(),
            }
        );
    }

    #[test]
    fn test_merge_concatenates_text_forms() {
        let rule = RuleRow::new("code", 0, "merge", "")
            .source_a("region")
            .slot_b("district", Value::Null);
        let rec = record(&[("region", json!("NW")), ("district", json!(7))]);
        let outcome = merge(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("NW7")));
    }

    #[test]
    fn test_count_comma_members() {
        let rule = RuleRow::new("n_selected", 0, "count", "").source_a("choices");
        let rec = record(&[("choices", json!("a,b,c"))]);
        let outcome = count(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(3.0)));
    }

    #[test]
    fn test_count_null_is_zero() {
        let rule = RuleRow::new("n_selected", 0, "count", "").source_a("choices");
        let rec = record(&[("choices", json!(null))]);
        let outcome = count(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(0.0)));
    }

    #[test]
    fn test_recode_reverses_scale() {
        let rule = RuleRow::new("q3_rev", 0, "recode", "").source_a("q3");
        let rec = record(&[("q3", json!(2))]);
        let outcome = recode(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!(4.0)));
    }

    #[test]
    fn test_recode_non_numeric_is_fatal() {
        let rule = RuleRow::new("q3_rev", 0, "recode", "").source_a("q3");
        let err = recode(&rule, &record(&[("q3", json!("high"))])).unwrap_err();
        assert!(matches!(err, EvalError::NonNumeric { .. }));
    }

    #[test]
    fn test_copy_stringifies() {
        let rule = RuleRow::new("age_text", 0, "", "").source_a("age");
        let rec = record(&[("age", json!(20))]);
        let outcome = copy(&rule, &rec).unwrap();
        assert_eq!(outcome, Outcome::ValueResolved(json!("20")));
    }

    #[test]
    fn test_missing_source_field_is_an_error() {
        let rule = RuleRow::new("age_text", 0, "", "").source_a("age");
        let err = copy(&rule, &record(&[])).unwrap_err();
        assert_eq!(err, EvalError::FieldMissing("age".to_string()));
    }
}

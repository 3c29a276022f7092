//! Value coercion helpers shared by the operator library
//!
//! A value "is numeric" if it parses as a floating-point number; comparisons
//! are performed on the parsed number regardless of the original text form.
//! List membership never coerces: it compares string forms.

use serde_json::Value;

/// Parses a value as a floating-point number, accepting both JSON numbers
/// and numeric text.
pub fn numeric(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Parses a value as an integer. JSON numbers convert when their value is
/// whole (a derived 4.0 is the integer 4); text must be integer-formed.
pub fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64().or_else(|| {
            n.as_f64()
                .filter(|f| f.fract() == 0.0 && f.is_finite())
                .map(|f| f as i64)
        }),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
}

/// Canonical string form: strings unquoted, numbers and booleans as
/// displayed, null empty.
pub fn text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// True for the values the is_null predicate treats as absent: JSON null
/// and the empty string.
pub fn is_null_like(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Splits a comma-separated literal into its string members.
pub fn split_list(literal: &str) -> Vec<&str> {
    literal.split(',').collect()
}

/// Parses a field value as a list of numbers.
///
/// A bare scalar is a one-element list; JSON arrays convert element-wise;
/// bracketed text like `"[1, 2]"` is split on commas. The first member that
/// fails to parse is returned as the error, in text form.
pub fn number_list(value: &Value) -> Result<Vec<f64>, String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(|item| numeric(item).ok_or_else(|| text(item)))
            .collect(),
        Value::String(s) if s.trim_start().starts_with('[') => {
            let inner = s.trim().trim_start_matches('[').trim_end_matches(']');
            if inner.trim().is_empty() {
                return Ok(Vec::new());
            }
            inner
                .split(',')
                .map(|part| {
                    part.trim()
                        .parse::<f64>()
                        .map_err(|_| part.trim().to_string())
                })
                .collect()
        }
        other => match numeric(other) {
            Some(n) => Ok(vec![n]),
            None => Err(text(other)),
        },
    }
}

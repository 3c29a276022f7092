//! Rule row structure
//!
//! One row of the derived-variable rule table. Serde field names follow the
//! survey lookup flatfile: source slots are `survey_id_a` through
//! `survey_id_d` with their literal operands.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One rule describing how to attempt computing one derived variable.
///
/// Up to four source slots (a-d) name response fields to read; each slot
/// carries a literal comparison operand, and slot a carries an optional
/// second literal for inclusive-range checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRow {
    /// Identifier of the derived variable this rule can produce
    #[serde(default)]
    pub new_variable: Option<String>,

    /// Pass during which this rule is attempted
    #[serde(default)]
    pub pass_number: u32,

    /// Operator family selector; absent means passthrough copy
    #[serde(default)]
    pub action: Option<String>,

    /// Sub-variant within the family, typically comma-joined predicate names
    #[serde(default)]
    pub detail: Option<String>,

    /// Source slot a: response field to read
    #[serde(rename = "survey_id_a", default)]
    pub key_a: Option<String>,

    /// Source slot a: first literal operand
    #[serde(rename = "survey_id_a_value_1", default)]
    pub value_a: Option<Value>,

    /// Source slot a: second literal operand (upper bound of inclusive ranges)
    #[serde(rename = "survey_id_a_value_2", default)]
    pub value_a2: Option<Value>,

    /// Source slot b: response field to read
    #[serde(rename = "survey_id_b", default)]
    pub key_b: Option<String>,

    /// Source slot b: literal operand
    #[serde(rename = "survey_id_b_value", default)]
    pub value_b: Option<Value>,

    /// Source slot c: response field to read
    #[serde(rename = "survey_id_c", default)]
    pub key_c: Option<String>,

    /// Source slot c: literal operand
    #[serde(rename = "survey_id_c_value", default)]
    pub value_c: Option<Value>,

    /// Source slot d: response field to read
    #[serde(rename = "survey_id_d", default)]
    pub key_d: Option<String>,

    /// Source slot d: literal operand
    #[serde(rename = "survey_id_d_value", default)]
    pub value_d: Option<Value>,

    /// Literal emitted when the rule's condition is satisfied
    #[serde(default)]
    pub fill_with_this: Option<Value>,

    /// Optional fallback literal
    #[serde(rename = "else", default)]
    pub else_value: Option<Value>,
}

impl RuleRow {
    /// Creates a bare rule for the given variable, pass and action.
    pub fn new(
        new_variable: impl Into<String>,
        pass_number: u32,
        action: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        let action = action.into();
        let detail = detail.into();
        Self {
            new_variable: Some(new_variable.into()),
            pass_number,
            action: if action.is_empty() { None } else { Some(action) },
            detail: if detail.is_empty() { None } else { Some(detail) },
            key_a: None,
            value_a: None,
            value_a2: None,
            key_b: None,
            value_b: None,
            key_c: None,
            value_c: None,
            key_d: None,
            value_d: None,
            fill_with_this: None,
            else_value: None,
        }
    }

    /// Sets source slot a (field name and literal operand).
    pub fn slot_a(mut self, key: impl Into<String>, value: Value) -> Self {
        self.key_a = Some(key.into());
        self.value_a = Some(value);
        self
    }

    /// Sets only the field name of slot a (aggregations ignore the literal).
    pub fn source_a(mut self, key: impl Into<String>) -> Self {
        self.key_a = Some(key.into());
        self
    }

    /// Sets slot a with both range bounds (inclusive-range checks).
    pub fn slot_a_range(mut self, key: impl Into<String>, low: Value, high: Value) -> Self {
        self.key_a = Some(key.into());
        self.value_a = Some(low);
        self.value_a2 = Some(high);
        self
    }

    /// Sets source slot b.
    pub fn slot_b(mut self, key: impl Into<String>, value: Value) -> Self {
        self.key_b = Some(key.into());
        self.value_b = Some(value);
        self
    }

    /// Sets source slot c.
    pub fn slot_c(mut self, key: impl Into<String>, value: Value) -> Self {
        self.key_c = Some(key.into());
        self.value_c = Some(value);
        self
    }

    /// Sets source slot d.
    pub fn slot_d(mut self, key: impl Into<String>, value: Value) -> Self {
        self.key_d = Some(key.into());
        self.value_d = Some(value);
        self
    }

    /// Sets the value emitted on success.
    pub fn fill(mut self, value: Value) -> Self {
        self.fill_with_this = Some(value);
        self
    }

    /// Sets the fallback literal.
    pub fn or_else(mut self, value: Value) -> Self {
        self.else_value = Some(value);
        self
    }

    /// Returns the field name of slot `index` (0 = a .. 3 = d).
    pub fn slot_key(&self, index: usize) -> Option<&str> {
        match index {
            0 => self.key_a.as_deref(),
            1 => self.key_b.as_deref(),
            2 => self.key_c.as_deref(),
            3 => self.key_d.as_deref(),
            _ => None,
        }
    }

    /// Returns the literal operand of slot `index` (0 = a .. 3 = d).
    pub fn slot_value(&self, index: usize) -> Option<&Value> {
        match index {
            0 => self.value_a.as_ref(),
            1 => self.value_b.as_ref(),
            2 => self.value_c.as_ref(),
            3 => self.value_d.as_ref(),
            _ => None,
        }
    }

    /// Returns the action string, empty if absent.
    pub fn action_str(&self) -> &str {
        self.action.as_deref().unwrap_or("")
    }

    /// Returns the detail string, empty if absent.
    pub fn detail_str(&self) -> &str {
        self.detail.as_deref().unwrap_or("")
    }

    /// Returns the variable name, empty if absent.
    pub fn variable_str(&self) -> &str {
        self.new_variable.as_deref().unwrap_or("")
    }
}

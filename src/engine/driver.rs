//! Pass resolution driver
//!
//! Resolves one response record against the rule table: passes over the
//! active variables, candidate rules in table order per variable, the
//! five-way outcome contract deciding what happens next. There is no
//! dependency graph; a variable whose inputs are produced later simply
//! defers and is retried on a later pass.

use std::collections::HashSet;

use crate::calc::{dispatch, EvalError, Operator, Outcome};
use crate::observability::{DeriveMetrics, Event, Logger};
use crate::record::ResponseRecord;
use crate::rules::{RuleRow, RuleTable};

use super::errors::{EngineError, EngineResult};

/// Options controlling one derivation run.
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOptions {
    /// Emit a trace line per rule attempt
    pub verbose: bool,
}

/// What happened to one variable within one pass.
enum VariableState {
    /// A value was written, or nothing terminal happened; keep the
    /// variable active for later passes
    Retained,
    /// Underlying data can never appear; drop the variable for good
    Abandoned,
    /// The all-done sentinel fired; stop the record
    Halted,
}

/// Resolves records one at a time against a rule table.
pub struct PassDriver<'a> {
    table: &'a RuleTable,
    options: EngineOptions,
    metrics: Option<&'a DeriveMetrics>,
}

impl<'a> PassDriver<'a> {
    /// Creates a driver with default options.
    pub fn new(table: &'a RuleTable) -> Self {
        Self {
            table,
            options: EngineOptions::default(),
            metrics: None,
        }
    }

    /// Replaces the run options.
    pub fn with_options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    /// Attaches a metrics registry.
    pub fn with_metrics(mut self, metrics: &'a DeriveMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Resolves every derivable variable for one record, in place.
    ///
    /// Variables that never resolve are simply absent afterwards; only
    /// configuration and numeric defects surface as errors, and those
    /// abort the whole batch.
    pub fn resolve(&self, record: &mut ResponseRecord) -> EngineResult<()> {
        let variables = self.table.variable_names();
        let mut abandoned: HashSet<String> = HashSet::new();

        for pass_number in 0..self.table.pass_count() {
            // Fresh snapshot per pass; abandonment never shrinks a list
            // being iterated.
            let active: Vec<&String> = variables
                .iter()
                .filter(|name| !abandoned.contains(name.as_str()))
                .collect();

            for variable in active {
                match self.resolve_variable(variable, pass_number, record)? {
                    VariableState::Retained => {}
                    VariableState::Abandoned => {
                        self.trace(
                            Event::VariableAbandoned,
                            &[("variable", variable), ("pass", &pass_number.to_string())],
                        );
                        abandoned.insert(variable.clone());
                        if let Some(m) = self.metrics {
                            m.variable_abandoned();
                        }
                    }
                    VariableState::Halted => {
                        self.trace(Event::RecordHalted, &[("pass", &pass_number.to_string())]);
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }

    /// Tries one variable's candidate rules for one pass.
    fn resolve_variable(
        &self,
        variable: &str,
        pass_number: u32,
        record: &mut ResponseRecord,
    ) -> EngineResult<VariableState> {
        for rule in self.table.candidates(variable, pass_number) {
            let operator = dispatch(rule);
            if let Some(m) = self.metrics {
                m.rule_attempted();
            }

            let result = operator.evaluate(rule, record);
            self.trace_attempt(variable, pass_number, &operator, rule, record, &result);

            match result {
                Ok(Outcome::ValueResolved(value)) => {
                    self.trace(
                        Event::ValueResolved,
                        &[("variable", variable), ("pass", &pass_number.to_string())],
                    );
                    record.insert(variable, value);
                    if let Some(m) = self.metrics {
                        m.variable_resolved();
                    }
                    return Ok(VariableState::Retained);
                }
                Ok(Outcome::ConditionsNotMet) => continue,
                Ok(Outcome::DataNotFound) => return Ok(VariableState::Abandoned),
                Ok(Outcome::DeferToNextPass) => return Ok(VariableState::Retained),
                Ok(Outcome::AllDone) => return Ok(VariableState::Halted),
                Err(EvalError::FieldMissing(_)) => return Ok(VariableState::Abandoned),
                Err(EvalError::UnmappedCalculator { action, detail }) => {
                    return Err(EngineError::Configuration {
                        action,
                        detail,
                        variable: variable.to_string(),
                        pass_number,
                    })
                }
                Err(EvalError::NonNumeric { field, value }) => {
                    return Err(EngineError::Numeric {
                        field,
                        value,
                        variable: variable.to_string(),
                        pass_number,
                    })
                }
            }
        }
        // Candidates exhausted without a terminal outcome: retried next pass.
        Ok(VariableState::Retained)
    }

    /// One trace line per rule attempt, when asked for.
    fn trace_attempt(
        &self,
        variable: &str,
        pass_number: u32,
        operator: &Operator,
        rule: &RuleRow,
        record: &ResponseRecord,
        result: &Result<Outcome, EvalError>,
    ) {
        if !self.options.verbose {
            return;
        }
        let pass = pass_number.to_string();
        let key_a = rule.slot_key(0).unwrap_or("");
        let input_a = record
            .get(key_a)
            .map(|value| value.to_string())
            .unwrap_or_default();
        let decision = match result {
            Ok(outcome) => outcome.name().to_string(),
            Err(err) => format!("error: {err}"),
        };
        Logger::trace(
            Event::RuleAttempt.as_str(),
            &[
                ("variable", variable),
                ("pass", &pass),
                ("operator", operator.name()),
                ("action", rule.action_str()),
                ("detail", rule.detail_str()),
                ("key_a", key_a),
                ("input_a", &input_a),
                ("decision", &decision),
            ],
        );
    }

    fn trace(&self, event: Event, fields: &[(&str, &str)]) {
        if self.options.verbose {
            Logger::trace(event.as_str(), fields);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn record(pairs: &[(&str, Value)]) -> ResponseRecord {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn conditional(var: &str, pass: u32, key: &str, at_least: i64, fill: &str) -> RuleRow {
        RuleRow::new(var, pass, "conditional", "greater_than_equal")
            .slot_a(key, json!(at_least))
            .fill(json!(fill))
    }

    #[test]
    fn test_resolves_single_variable() {
        let table = RuleTable::new(vec![conditional("age_grp", 0, "age", 18, "adult")]);
        let mut rec = record(&[("age", json!(20))]);

        PassDriver::new(&table).resolve(&mut rec).unwrap();
        assert_eq!(rec.get("age_grp"), Some(&json!("adult")));
    }

    #[test]
    fn test_first_success_wins_within_a_pass() {
        let table = RuleTable::new(vec![
            conditional("band", 0, "score", 90, "high"),
            conditional("band", 0, "score", 50, "mid"),
            conditional("band", 0, "score", 0, "low"),
        ]);
        let mut rec = record(&[("score", json!(60))]);

        PassDriver::new(&table).resolve(&mut rec).unwrap();
        assert_eq!(rec.get("band"), Some(&json!("mid")));
    }

    #[test]
    fn test_missing_source_abandons_variable_for_all_passes() {
        let table = RuleTable::new(vec![
            conditional("age_grp", 0, "age", 18, "adult"),
            // Would succeed in pass 1 if the variable were still active.
            RuleRow::new("age_grp", 1, "", "").source_a("backup_age"),
        ]);
        let mut rec = record(&[("backup_age", json!(30))]);

        PassDriver::new(&table).resolve(&mut rec).unwrap();
        assert_eq!(rec.get("age_grp"), None);
    }

    #[test]
    fn test_defer_retries_on_next_pass() {
        let table = RuleTable::new(vec![
            RuleRow::new("late", 0, "defer", ""),
            RuleRow::new("late", 1, "", "").source_a("source"),
        ]);
        let mut rec = record(&[("source", json!("value"))]);

        PassDriver::new(&table).resolve(&mut rec).unwrap();
        assert_eq!(rec.get("late"), Some(&json!("value")));
    }

    #[test]
    fn test_all_done_halts_record_without_reverting() {
        let table = RuleTable::new(vec![
            conditional("first", 0, "age", 0, "resolved"),
            RuleRow::new("stop", 0, "all_done", ""),
            conditional("never", 0, "age", 0, "unreachable"),
        ]);
        let mut rec = record(&[("age", json!(20))]);

        PassDriver::new(&table).resolve(&mut rec).unwrap();
        assert_eq!(rec.get("first"), Some(&json!("resolved")));
        assert_eq!(rec.get("stop"), None);
        assert_eq!(rec.get("never"), None);
    }

    #[test]
    fn test_unmapped_rule_is_fatal_with_context() {
        let table = RuleTable::new(vec![RuleRow::new("bad", 2, "median", "fuzzy")]);
        let mut rec = record(&[]);

        let err = PassDriver::new(&table).resolve(&mut rec).unwrap_err();
        assert_eq!(
            err,
            EngineError::Configuration {
                action: "median".to_string(),
                detail: "fuzzy".to_string(),
                variable: "bad".to_string(),
                pass_number: 2,
            }
        );
    }

    #[test]
    fn test_numeric_defect_is_fatal_with_context() {
        let table = RuleTable::new(vec![RuleRow::new("q_rev", 0, "recode", "").source_a("q1")]);
        let mut rec = record(&[("q1", json!("often"))]);

        let err = PassDriver::new(&table).resolve(&mut rec).unwrap_err();
        assert_eq!(
            err,
            EngineError::Numeric {
                field: "q1".to_string(),
                value: "often".to_string(),
                variable: "q_rev".to_string(),
                pass_number: 0,
            }
        );
    }

    #[test]
    fn test_metrics_count_attempts_and_outcomes() {
        let metrics = DeriveMetrics::new();
        let table = RuleTable::new(vec![
            conditional("age_grp", 0, "age", 18, "adult"),
            conditional("ghost", 0, "absent_field", 1, "x"),
        ]);
        let mut rec = record(&[("age", json!(20))]);

        PassDriver::new(&table)
            .with_metrics(&metrics)
            .resolve(&mut rec)
            .unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.rules_attempted, 2);
        assert_eq!(snapshot.variables_resolved, 1);
        assert_eq!(snapshot.variables_abandoned, 1);
    }
}

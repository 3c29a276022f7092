//! CLI command implementations
//!
//! Each command loads what it needs, delegates to the library, and prints
//! one JSON document. Process exit codes are decided in main.

use std::path::Path;

use serde_json::json;

use crate::calc::{dispatch, Operator};
use crate::engine::{BatchOptions, BatchRunner, EngineOptions};
use crate::rules::{load_rules, RuleTable};

use super::args::{Cli, Command};
use super::errors::{CliError, CliResult};
use super::io::{read_responses, write_responses};

/// Parses arguments and dispatches to a command.
pub fn run() -> CliResult<()> {
    match Cli::parse_args().command {
        Command::Derive {
            rules,
            responses,
            out,
            verbose,
            parallel,
        } => derive(&rules, &responses, out.as_deref(), verbose, parallel),
        Command::Inspect { rules } => inspect(&rules),
        Command::Check { rules } => check(&rules),
    }
}

/// Resolves a batch of responses and writes the augmented records.
pub fn derive(
    rules: &Path,
    responses: &Path,
    out: Option<&Path>,
    verbose: bool,
    parallel: bool,
) -> CliResult<()> {
    let table = load_rules(rules)?;
    let mut records = read_responses(responses)?;

    let options = BatchOptions {
        engine: EngineOptions { verbose },
        parallel,
    };
    BatchRunner::new(&table).with_options(options).run(&mut records)?;

    write_responses(out, &records)
}

/// Prints a rule table summary: variables, passes, rows per pass.
pub fn inspect(rules: &Path) -> CliResult<()> {
    let table = load_rules(rules)?;

    let per_pass: Vec<serde_json::Value> = (0..table.pass_count())
        .map(|pass| {
            let rows = table
                .rows()
                .iter()
                .filter(|row| row.pass_number == pass)
                .count();
            json!({"pass": pass, "rows": rows})
        })
        .collect();

    let summary = json!({
        "rows": table.len(),
        "variables": table.variable_names(),
        "passes": table.pass_count(),
        "rows_per_pass": per_pass,
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

/// Dry-runs dispatch over every row; unmapped pairs fail the command.
pub fn check(rules: &Path) -> CliResult<()> {
    let table = load_rules(rules)?;
    let unmapped = unmapped_rows(&table);
    let count = unmapped.len();

    let report = json!({
        "rows": table.len(),
        "unmapped": unmapped,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    if count == 0 {
        Ok(())
    } else {
        Err(CliError::UnmappedRules { count })
    }
}

/// Rows whose action/detail pair maps to no calculator.
fn unmapped_rows(table: &RuleTable) -> Vec<serde_json::Value> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| dispatch(row) == Operator::Unmapped)
        .map(|(index, row)| {
            json!({
                "row": index,
                "variable": row.variable_str(),
                "action": row.action_str(),
                "detail": row.detail_str(),
                "pass": row.pass_number,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleRow;

    #[test]
    fn test_unmapped_rows_reports_offenders() {
        let table = RuleTable::new(vec![
            RuleRow::new("ok", 0, "sum", ""),
            RuleRow::new("bad", 1, "median", "fuzzy"),
        ]);

        let unmapped = unmapped_rows(&table);
        assert_eq!(unmapped.len(), 1);
        assert_eq!(unmapped[0]["variable"], "bad");
        assert_eq!(unmapped[0]["action"], "median");
        assert_eq!(unmapped[0]["pass"], 1);
    }

    #[test]
    fn test_clean_table_has_no_unmapped_rows() {
        let table = RuleTable::new(vec![
            RuleRow::new("a", 0, "conditional", "equal"),
            RuleRow::new("b", 0, "merge", ""),
            RuleRow::new("c", 1, "all_done", ""),
        ]);
        assert!(unmapped_rows(&table).is_empty());
    }
}

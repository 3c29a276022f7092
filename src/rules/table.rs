//! Rule table: ordered, immutable rule rows
//!
//! The table is the only configuration the resolution engine reads. It is
//! consulted three ways: distinct variable names (first-seen order), the
//! total pass count, and the candidate rows for one (variable, pass) pair.

use super::row::RuleRow;

/// An ordered, immutable collection of rule rows.
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rows: Vec<RuleRow>,
}

impl RuleTable {
    /// Creates a table from rows, preserving their order.
    pub fn new(rows: Vec<RuleRow>) -> Self {
        Self { rows }
    }

    /// Returns all rows in table order.
    pub fn rows(&self) -> &[RuleRow] {
        &self.rows
    }

    /// Returns the number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct non-empty variable names, in first-seen table order.
    pub fn variable_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in &self.rows {
            let name = row.variable_str();
            if name.is_empty() {
                continue;
            }
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Number of resolution passes: 1 + the highest pass number in the table.
    ///
    /// An empty table has zero passes.
    pub fn pass_count(&self) -> u32 {
        self.rows
            .iter()
            .map(|row| row.pass_number + 1)
            .max()
            .unwrap_or(0)
    }

    /// Candidate rows for one variable in one pass, in table order.
    pub fn candidates<'a>(
        &'a self,
        variable: &'a str,
        pass_number: u32,
    ) -> impl Iterator<Item = &'a RuleRow> {
        self.rows.iter().filter(move |row| {
            row.variable_str() == variable && row.pass_number == pass_number
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(var: &str, pass: u32) -> RuleRow {
        RuleRow::new(var, pass, "merge", "")
    }

    #[test]
    fn test_variable_names_first_seen_order() {
        let table = RuleTable::new(vec![
            row("b_total", 0),
            row("a_grp", 0),
            row("b_total", 1),
            row("c_flag", 2),
        ]);

        assert_eq!(table.variable_names(), vec!["b_total", "a_grp", "c_flag"]);
    }

    #[test]
    fn test_variable_names_skip_empty() {
        let mut anonymous = row("x", 0);
        anonymous.new_variable = None;
        let mut blank = row("y", 0);
        blank.new_variable = Some(String::new());

        let table = RuleTable::new(vec![anonymous, blank, row("named", 0)]);
        assert_eq!(table.variable_names(), vec!["named"]);
    }

    #[test]
    fn test_pass_count() {
        let table = RuleTable::new(vec![row("a", 0), row("b", 3), row("c", 1)]);
        assert_eq!(table.pass_count(), 4);
    }

    #[test]
    fn test_pass_count_empty_table() {
        assert_eq!(RuleTable::default().pass_count(), 0);
    }

    #[test]
    fn test_candidates_filtered_in_table_order() {
        let mut first = row("grp", 1);
        first.detail = Some("equal".to_string());
        let mut second = row("grp", 1);
        second.detail = Some("is_in".to_string());

        let table = RuleTable::new(vec![row("grp", 0), first, second, row("other", 1)]);
        let details: Vec<&str> = table
            .candidates("grp", 1)
            .map(|r| r.detail_str())
            .collect();

        assert_eq!(details, vec!["equal", "is_in"]);
    }
}

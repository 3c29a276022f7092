//! Rule table ingestion
//!
//! Reads a JSON array of rule rows. The engine itself only requires an
//! ordered sequence of rows; preparing that file (flatfile exports, bulk
//! store mounts) is a collaborator concern.

use std::fs;
use std::path::Path;

use super::errors::{TableError, TableResult};
use super::row::RuleRow;
use super::table::RuleTable;

/// Loads a rule table from a JSON array file.
pub fn load_rules(path: &Path) -> TableResult<RuleTable> {
    let data = fs::read_to_string(path).map_err(|source| TableError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let rows: Vec<RuleRow> = serde_json::from_str(&data).map_err(|source| TableError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(RuleTable::new(rows))
}

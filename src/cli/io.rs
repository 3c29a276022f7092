//! Response file I/O
//!
//! Responses travel as a JSON array of records, each `{"values": {...}}`.
//! Output goes to a file or stdout, pretty-printed either way.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::record::ResponseRecord;

use super::errors::{CliError, CliResult};

/// Reads a batch of response records from a JSON array file.
pub fn read_responses(path: &Path) -> CliResult<Vec<ResponseRecord>> {
    let data = fs::read_to_string(path).map_err(|source| CliError::ReadResponses {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&data).map_err(|source| CliError::ParseResponses {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes augmented records to a file, or stdout when no path is given.
pub fn write_responses(out: Option<&Path>, records: &[ResponseRecord]) -> CliResult<()> {
    let body = serde_json::to_string_pretty(records)?;
    match out {
        Some(path) => fs::write(path, body.as_bytes())?,
        None => {
            let mut stdout = std::io::stdout();
            stdout.write_all(body.as_bytes())?;
            stdout.write_all(b"\n")?;
        }
    }
    Ok(())
}

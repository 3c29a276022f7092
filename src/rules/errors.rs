//! Rule table errors

use std::path::PathBuf;

use thiserror::Error;

/// Result type for rule table operations
pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while loading a rule table
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Failed to read rule table {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse rule table {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

//! CLI errors

use std::path::PathBuf;

use thiserror::Error;

use crate::engine::EngineError;
use crate::rules::TableError;

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

/// CLI errors
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Failed to read responses {path}: {source}")]
    ReadResponses {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse responses {path}: {source}")]
    ParseResponses {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Failed to write output: {0}")]
    WriteOutput(#[from] std::io::Error),

    #[error("Failed to serialize output: {0}")]
    SerializeOutput(#[from] serde_json::Error),

    #[error("{count} rule row(s) map to no calculator")]
    UnmappedRules { count: usize },
}

//! CLI argument definitions using clap
//!
//! Commands:
//! - varcalc derive --rules <path> --responses <path> [--out <path>] [--verbose] [--parallel]
//! - varcalc inspect --rules <path>
//! - varcalc check --rules <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// varcalc - A strict, deterministic derived-variable calculator for survey responses
#[derive(Parser, Debug)]
#[command(name = "varcalc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Resolve derived variables for a batch of responses
    Derive {
        /// Path to the rule table (JSON array of rule rows)
        #[arg(long)]
        rules: PathBuf,

        /// Path to the responses (JSON array of response records)
        #[arg(long)]
        responses: PathBuf,

        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,

        /// Emit a trace line per rule attempt
        #[arg(long)]
        verbose: bool,

        /// Resolve records across a thread pool
        #[arg(long)]
        parallel: bool,
    },

    /// Summarize a rule table
    Inspect {
        /// Path to the rule table
        #[arg(long)]
        rules: PathBuf,
    },

    /// Verify every rule row maps to a calculator
    Check {
        /// Path to the rule table
        #[arg(long)]
        rules: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

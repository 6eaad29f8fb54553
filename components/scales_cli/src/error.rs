//! Error types for the CLI

use core_types::ScaleError;
use thiserror::Error;

/// CLI-specific errors
#[derive(Debug, Error)]
pub enum CliError {
    /// Loading types or estimating failed
    #[error(transparent)]
    Scale(#[from] ScaleError),

    /// No `--type`, `--string` or `--all` was given
    #[error("nothing to measure: pass --type NAME, --string TEXT or --all")]
    NoTarget,

    /// The JSON report could not be produced
    #[error("could not encode report: {0}")]
    Report(#[from] serde_json::Error),

    /// Writing the report to stdout failed
    #[error("output error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for CLI operations
pub type CliResult<T> = Result<T, CliError>;

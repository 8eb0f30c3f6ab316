// ============================================================
// Layer 3 — Pipeline Errors
// ============================================================
// Every fallible operation below the application layer returns
// one of these variants. The application layer wraps them in
// anyhow with context before they reach the CLI.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used by the data, ml and infra layers.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Error, Debug)]
pub enum PipelineError {
    /// Missing secret, template, column, or an invalid parameter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Every connection attempt failed.
    #[error("connection error: gave up after {attempts} attempt(s): {last_error}")]
    Connection { attempts: u32, last_error: String },

    #[error("query error: {0}")]
    Query(String),

    /// Missing values or non-numeric cells where numbers are required.
    #[error("data quality error: {0}")]
    DataQuality(String),

    #[error("training error: {0}")]
    Training(String),

    #[error("report error: {0}")]
    Report(String),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("dataframe error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}

/// Coarse classification used by the CLI to decide how to react.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Connection,
    Query,
    DataQuality,
    Training,
    Report,
}

impl PipelineError {
    /// Wrap an `std::io::Error` together with the path it happened on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io { path: path.into(), source }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Configuration(_) => ErrorKind::Configuration,
            PipelineError::Connection { .. } => ErrorKind::Connection,
            PipelineError::Query(_)         => ErrorKind::Query,
            PipelineError::DataQuality(_)   => ErrorKind::DataQuality,
            PipelineError::Training(_)      => ErrorKind::Training,
            PipelineError::Report(_)        => ErrorKind::Report,
            // Unreadable inputs are treated as a setup problem
            PipelineError::Io { .. } | PipelineError::Csv(_) | PipelineError::Polars(_) => {
                ErrorKind::Configuration
            }
        }
    }

    /// Data-quality and report failures can be logged and skipped;
    /// everything else must stop the run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self.kind(), ErrorKind::DataQuality | ErrorKind::Report)
    }
}

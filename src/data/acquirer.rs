// ============================================================
// Layer 4 — Data Acquirer
// ============================================================
// Runs the scoring query against an open connection and checks
// the result for completeness.
//
// There is no retry here: retries belong to connection setup.
// A failed query is logged and returned as a QueryError.
//
// validate() does not fail on missing values. It tags the frame
// as Incomplete so the caller can decide to skip downstream work.

use polars::prelude::DataFrame;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::missing_count;
use crate::domain::traits::SqlSource;

/// Outcome of the completeness check.
#[derive(Debug, Clone)]
pub enum Checked {
    /// No missing cells.
    Complete(DataFrame),
    /// At least one missing cell; the data is withheld.
    Incomplete { missing_cells: usize },
}

impl Checked {
    /// Turn an Incomplete tag into a DataQuality error.
    pub fn into_result(self) -> Result<DataFrame> {
        match self {
            Checked::Complete(df) => Ok(df),
            Checked::Incomplete { missing_cells } => Err(PipelineError::DataQuality(format!(
                "{missing_cells} missing value(s) found"
            ))),
        }
    }
}

/// Execute `query` once and materialise every row.
pub fn execute<S: SqlSource + ?Sized>(query: &str, source: &mut S) -> Result<DataFrame> {
    tracing::info!("Extracting data");
    match source.fetch(query) {
        Ok(df) => {
            let (rows, cols) = df.shape();
            tracing::info!("Query returned {} rows x {} columns", rows, cols);
            Ok(df)
        }
        Err(e) => {
            tracing::error!("Query execution failed: {}", e);
            Err(match e {
                PipelineError::Query(_) => e,
                other => PipelineError::Query(other.to_string()),
            })
        }
    }
}

/// Count missing cells; tag the frame accordingly.
pub fn validate(df: DataFrame) -> Checked {
    let missing_cells = missing_count(&df);
    if missing_cells > 0 {
        tracing::warn!("Missing values found: {} cell(s)", missing_cells);
        Checked::Incomplete { missing_cells }
    } else {
        tracing::debug!("No missing values found");
        Checked::Complete(df)
    }
}

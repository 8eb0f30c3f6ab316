// ============================================================
// Layer 6 — Report Writer
// ============================================================
// Writes the validation summary as a one-row CSV:
//
//   CV Mean,CV Std,Testset-MSE,Testset-RMSE,Testset-MAPE
//   0.1834,0.0123,1.2e10,109544.5,0.1752
//
// The file is overwritten on every run.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};

/// One summary row per training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    /// Mean cross-validation MAPE (already negated back to positive)
    #[serde(rename = "CV Mean")]
    pub cv_mean: f64,

    #[serde(rename = "CV Std")]
    pub cv_std: f64,

    #[serde(rename = "Testset-MSE")]
    pub test_mse: f64,

    #[serde(rename = "Testset-RMSE")]
    pub test_rmse: f64,

    #[serde(rename = "Testset-MAPE")]
    pub test_mape: f64,
}

impl ReportRecord {
    /// Render as a two-line text table for the log.
    pub fn to_table_string(&self) -> String {
        format!(
            "{:>12} {:>12} {:>16} {:>16} {:>14}\n{:>12.6} {:>12.6} {:>16.4} {:>16.4} {:>14.6}",
            "CV Mean", "CV Std", "Testset-MSE", "Testset-RMSE", "Testset-MAPE",
            self.cv_mean, self.cv_std, self.test_mse, self.test_rmse, self.test_mape,
        )
    }
}

/// Write `record` to `path` with a header row.
pub fn write_report(path: &Path, record: &ReportRecord) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.serialize(record)?;
    writer.flush().map_err(|e| PipelineError::io(path, e))?;
    tracing::info!("Report written to '{}'", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReportRecord {
        ReportRecord { cv_mean: 0.18, cv_std: 0.01, test_mse: 4.0, test_rmse: 2.0, test_mape: 0.2 }
    }

    #[test]
    fn test_writes_header_and_one_row() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        write_report(&path, &record()).unwrap();

        let text  = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "CV Mean,CV Std,Testset-MSE,Testset-RMSE,Testset-MAPE");
        assert_eq!(lines[1], "0.18,0.01,4.0,2.0,0.2");
    }

    #[test]
    fn test_unwritable_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("results.csv");
        assert!(write_report(&path, &record()).is_err());
    }
}

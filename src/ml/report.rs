// ============================================================
// Layer 5 — Report Generator
// ============================================================
// Scores the fitted model on the held-out split and writes:
//
//   results.csv       → one ReportRecord row
//   pred_vs_real.png  → actual vs. predicted test values
//
//   cv_mean   = -mean(cv_scores)   (scores are negative MAPE)
//   cv_std    =  std(cv_scores)    (population)
//   test_mse, test_rmse, test_mape on the test split
//
// Metric and CSV failures are returned as ReportError. A plot
// failure is logged and swallowed once the CSV has landed.

use std::path::PathBuf;

use ndarray::{Array1, Array2};

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Regressor;
use crate::infra::plot::plot_predictions;
use crate::infra::report_writer::{write_report, ReportRecord};
use crate::ml::metrics::{
    mean, mean_absolute_percentage_error, mean_squared_error, root_mean_squared_error, std_dev,
};

pub struct ReportGenerator {
    results_path: PathBuf,
    plot_path:    PathBuf,
}

impl ReportGenerator {
    pub fn new(results_path: impl Into<PathBuf>, plot_path: impl Into<PathBuf>) -> Self {
        Self {
            results_path: results_path.into(),
            plot_path:    plot_path.into(),
        }
    }

    pub fn generate<M: Regressor>(
        &self,
        model:     &M,
        x_test:    &Array2<f64>,
        y_test:    &Array1<f64>,
        cv_scores: &[f64],
    ) -> Result<ReportRecord> {
        tracing::info!("Building performance report");

        if y_test.is_empty() || cv_scores.is_empty() {
            return Err(PipelineError::Report(
                "need a non-empty test split and at least one CV score".into(),
            ));
        }

        let predicted = model
            .predict(x_test)
            .map_err(|e| PipelineError::Report(format!("prediction failed: {e}")))?;

        let record = ReportRecord {
            cv_mean:   -mean(cv_scores),
            cv_std:    std_dev(cv_scores),
            test_mse:  mean_squared_error(y_test, &predicted),
            test_rmse: root_mean_squared_error(y_test, &predicted),
            test_mape: mean_absolute_percentage_error(y_test, &predicted),
        };

        tracing::info!("Performance report:");
        tracing::info!("\n\t{}", record.to_table_string().replace('\n', "\n\t"));

        write_report(&self.results_path, &record)
            .map_err(|e| PipelineError::Report(format!("cannot write summary: {e}")))?;

        tracing::info!("Plotting predictions vs. actual values");
        if let Err(e) = plot_predictions(&self.plot_path, &y_test.to_vec(), &predicted.to_vec()) {
            tracing::error!("Could not write '{}': {}", self.plot_path.display(), e);
        }

        Ok(record)
    }
}

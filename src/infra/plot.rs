// ============================================================
// Layer 6 — Prediction Plot
// ============================================================
// Draws actual vs. predicted test values as two line series
// with point markers, x = test row position:
//
//   blue → actual target
//   red  → model prediction
//
// No captions or axis labels: the bitmap backend is built
// without font support, so the image carries no text.

use std::path::Path;

use plotters::prelude::*;

use crate::domain::error::{PipelineError, Result};

const WIDTH:  u32 = 1800;
const HEIGHT: u32 = 1000;

fn plot_err<E: std::fmt::Display>(e: E) -> PipelineError {
    PipelineError::Report(format!("cannot draw plot: {e}"))
}

/// Render `actual` and `predicted` to a PNG at `path`.
pub fn plot_predictions(path: &Path, actual: &[f64], predicted: &[f64]) -> Result<()> {
    if actual.is_empty() || actual.len() != predicted.len() {
        return Err(PipelineError::Report(format!(
            "need two equal, non-empty series; got {} actual and {} predicted",
            actual.len(),
            predicted.len()
        )));
    }

    let (lo, hi) = actual
        .iter()
        .chain(predicted)
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
    if !lo.is_finite() {
        return Err(PipelineError::Report("series hold no finite values".into()));
    }
    let pad = ((hi - lo) * 0.05).max(1.0);

    let root = BitMapBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let x_max = (actual.len().max(2) - 1) as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .build_cartesian_2d(0f64..x_max, (lo - pad)..(hi + pad))
        .map_err(plot_err)?;

    for (series, color) in [(actual, BLUE), (predicted, RED)] {
        chart
            .draw_series(
                LineSeries::new(
                    series.iter().enumerate().map(|(i, &v)| (i as f64, v)),
                    color.stroke_width(2),
                )
                .point_size(4),
            )
            .map_err(plot_err)?;
    }

    root.present().map_err(plot_err)?;
    tracing::info!("Prediction plot written to '{}'", path.display());
    Ok(())
}

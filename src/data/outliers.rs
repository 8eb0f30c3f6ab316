// ============================================================
// Layer 4 — Outlier Filter
// ============================================================
// Removes rows with extreme values in any numeric column.
//
// For each numeric column c:
//   Q1, Q3  = 25th / 75th percentiles of c (missing cells ignored)
//   IQR     = Q3 - Q1
//   bounds  = [Q1 - k*IQR, Q3 + k*IQR]
//
// A row is an outlier if any of its numeric cells falls outside
// that column's bounds. All bounds are computed once, from the
// frame as it is when the call starts.
//
// Two phases, over stable row indices:
//   1. mark  — scan columns (outer) x rows (inner) and collect
//              the index of every violating row in a set
//   2. remove — filter the frame with a keep-mask built from
//              the set, so each marked row goes exactly once
//
// So a row breaking two columns is removed once and counted once
// in `removed_rows`; `violations` still counts both cells.
//
// Percentiles come from polars with QuantileMethod::Linear:
//   pos = (n - 1) * q,  value = x[floor] + frac * (x[ceil] - x[floor])

use std::collections::BTreeSet;

use polars::prelude::*;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::numeric_columns;

/// Default IQR multiplier.
pub const DEFAULT_K: f64 = 1.5;

/// Bounds computed for one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct QuartileBounds {
    pub column: String,
    pub q1:     f64,
    pub q3:     f64,
    pub lower:  f64,
    pub upper:  f64,
}

impl QuartileBounds {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// What a filtering pass did.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierReport {
    pub bounds:       Vec<QuartileBounds>,
    /// Unique rows removed.
    pub removed_rows: usize,
    /// (row, column) pairs outside their bounds.
    pub violations:   usize,
}

fn as_f64(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.clone())
}

/// Compute bounds for every numeric column of `df`.
///
/// Columns with no values at all get no bounds.
pub fn quartile_bounds(df: &DataFrame, k: f64) -> Result<Vec<QuartileBounds>> {
    if !k.is_finite() || k < 0.0 {
        return Err(PipelineError::Configuration(format!(
            "IQR multiplier must be a finite number >= 0, got {k}"
        )));
    }

    let mut bounds = Vec::new();
    for name in numeric_columns(df) {
        let values = as_f64(df, &name)?;
        let (Some(q1), Some(q3)) = (
            values.quantile(0.25, QuantileMethod::Linear)?,
            values.quantile(0.75, QuantileMethod::Linear)?,
        ) else {
            continue;
        };

        let iqr = q3 - q1;
        bounds.push(QuartileBounds {
            column: name,
            q1,
            q3,
            lower: q1 - k * iqr,
            upper: q3 + k * iqr,
        });
    }
    Ok(bounds)
}

/// Remove outlier rows from `df`.
pub fn remove_outliers(df: &mut DataFrame, k: f64) -> Result<OutlierReport> {
    tracing::info!("Removing outliers (k = {})", k);

    let bounds = quartile_bounds(df, k)?;
    for b in &bounds {
        tracing::debug!(
            "{}: Q1={} Q3={} IQR={} range=[{}, {}]",
            b.column, b.q1, b.q3, b.iqr(), b.lower, b.upper
        );
    }

    // ── Phase 1: mark ─────────────────────────────────────────────────────────
    let mut marked     = BTreeSet::new();
    let mut violations = 0usize;

    for b in &bounds {
        let values = as_f64(df, &b.column)?;
        for (row_idx, value) in values.into_iter().enumerate() {
            if let Some(value) = value {
                if !b.contains(value) {
                    violations += 1;
                    marked.insert(row_idx);
                }
            }
        }
    }

    // ── Phase 2: remove ───────────────────────────────────────────────────────
    if !marked.is_empty() {
        let keep: BooleanChunked = (0..df.height()).map(|i| !marked.contains(&i)).collect();
        *df = df.filter(&keep)?;
    }

    tracing::info!(
        "Found and removed {} outlier row(s) ({} out-of-range cell(s))",
        marked.len(),
        violations
    );

    Ok(OutlierReport {
        bounds,
        removed_rows: marked.len(),
        violations,
    })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    /// 100 rows: "area" cycles 50..59, "valor" is 100..199, "bairro" is text.
    fn listings_with(edit: impl Fn(usize, &mut f64, &mut f64)) -> DataFrame {
        let mut area   = Vec::new();
        let mut bairro = Vec::new();
        let mut valor  = Vec::new();
        for i in 0..100 {
            let mut a = 50.0 + (i % 10) as f64;
            let mut v = 100.0 + i as f64;
            edit(i, &mut a, &mut v);
            area.push(a);
            bairro.push(if i % 2 == 0 { "Centro" } else { "Praia" });
            valor.push(v);
        }
        DataFrame::new(vec![
            Series::new("area".into(), area).into(),
            Series::new("bairro".into(), bairro).into(),
            Series::new("valor".into(), valor).into(),
        ])
        .unwrap()
    }

    fn values(df: &DataFrame, name: &str) -> Vec<Option<f64>> {
        as_f64(df, name).unwrap().into_iter().collect()
    }

    #[test]
    fn test_quartiles_interpolate_linearly() {
        let df = DataFrame::new(vec![Series::new("x".into(), &[1.0, 2.0, 3.0, 4.0]).into()]).unwrap();
        let b  = &quartile_bounds(&df, 1.0).unwrap()[0];
        assert_eq!((b.q1, b.q3), (1.75, 3.25));
        assert_eq!((b.lower, b.upper), (0.25, 4.75));
    }

    #[test]
    fn test_removes_exactly_the_injected_extremes() {
        let injected = [3usize, 27, 48, 71, 96];
        let mut df = listings_with(|i, area, _| {
            if injected.contains(&i) {
                *area = 10_000.0;
            }
        });

        let report = remove_outliers(&mut df, DEFAULT_K).unwrap();

        assert_eq!(report.removed_rows, 5);
        assert_eq!(report.violations, 5);
        assert_eq!(df.height(), 95);
        assert!(values(&df, "area").iter().all(|v| v.unwrap() < 100.0));
        assert_eq!(df.column("bairro").unwrap().len(), 95);
    }

    #[test]
    fn test_row_breaking_two_columns_is_removed_once() {
        let mut df = listings_with(|i, area, valor| {
            if i == 10 {
                *area  = 9_999.0;
                *valor = -9_999.0;
            }
        });

        let report = remove_outliers(&mut df, DEFAULT_K).unwrap();
        assert_eq!(report.removed_rows, 1);
        assert_eq!(report.violations, 2);
        assert_eq!(df.height(), 99);
    }

    #[test]
    fn test_never_removes_rows_inside_original_bounds() {
        // Skewed data so some rows really are outliers
        let (mut xs, mut ys) = (Vec::new(), Vec::new());
        for i in 0..60u32 {
            xs.push(((i * 37) % 23) as f64 + if i % 13 == 0 { 80.0 } else { 0.0 });
            ys.push(((i * 11) % 17) as f64 * (1.0 + (i % 29 == 0) as u32 as f64 * 30.0));
        }
        let mut df = DataFrame::new(vec![
            Series::new("x".into(), xs.clone()).into(),
            Series::new("y".into(), ys.clone()).into(),
        ])
        .unwrap();
        let bounds = quartile_bounds(&df, DEFAULT_K).unwrap();

        remove_outliers(&mut df, DEFAULT_K).unwrap();

        let expected_kept: Vec<(f64, f64)> = xs
            .into_iter()
            .zip(ys)
            .filter(|(x, y)| bounds[0].contains(*x) && bounds[1].contains(*y))
            .collect();
        let kept: Vec<(f64, f64)> = values(&df, "x")
            .into_iter()
            .zip(values(&df, "y"))
            .map(|(x, y)| (x.unwrap(), y.unwrap()))
            .collect();
        assert_eq!(kept, expected_kept);
        assert!(df.height() < 60);
    }

    #[test]
    fn test_repeated_passes_never_grow() {
        let squares: Vec<f64> = (0..40).map(|i| (i * i) as f64).collect();
        let mut df = DataFrame::new(vec![Series::new("x".into(), squares).into()]).unwrap();

        let mut previous = df.height();
        for _ in 0..4 {
            remove_outliers(&mut df, DEFAULT_K).unwrap();
            assert!(df.height() <= previous);
            previous = df.height();
        }
    }

    #[test]
    fn test_missing_cells_are_ignored() {
        let mut df = DataFrame::new(vec![
            Series::new("x".into(), &[Some(1.0), None, Some(2.0), Some(3.0)]).into(),
        ])
        .unwrap();
        let report = remove_outliers(&mut df, DEFAULT_K).unwrap();
        assert_eq!(report.removed_rows, 0);
        assert_eq!(df.height(), 4);
    }

    #[test]
    fn test_negative_k_is_rejected() {
        let mut df = listings_with(|_, _, _| {});
        assert!(matches!(
            remove_outliers(&mut df, -1.0),
            Err(PipelineError::Configuration(_))
        ));
        assert_eq!(df.height(), 100);
    }
}

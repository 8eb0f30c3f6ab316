// ============================================================
// Layer 5 — Linear Regression
// ============================================================
// Ordinary least squares with an intercept, fitted on centred
// data through the normal equations:
//
//   (XᵀX + λI) w = Xᵀy        solved by Cholesky
//   intercept    = mean(y) - mean(X)·w
//
// λ starts at zero and is raised only when the system is rank
// deficient, which happens as soon as a full set of one-hot
// columns sits next to the intercept.

use ndarray::{Array1, Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Regressor;

/// Relative pivot size below which the system counts as singular.
const PIVOT_TOLERANCE: f64 = 1e-10;

/// Ridge jitter schedule used for rank-deficient systems.
const JITTER_START: f64 = 1e-10;
const JITTER_STEPS: usize = 8;

/// Cholesky solve of a symmetric system. `None` when a pivot collapses.
fn cholesky_solve(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for i in 0..n {
        for j in 0..=i {
            let mut sum = 0.0;
            for k in 0..j {
                sum += l[[i, k]] * l[[j, k]];
            }
            if i == j {
                let diag = a[[i, i]] - sum;
                if diag <= PIVOT_TOLERANCE * a[[i, i]].abs().max(1.0) {
                    return None;
                }
                l[[i, j]] = diag.sqrt();
            } else {
                l[[i, j]] = (a[[i, j]] - sum) / l[[j, j]];
            }
        }
    }

    // Forward substitution: L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let sum: f64 = (0..i).map(|j| l[[i, j]] * y[j]).sum();
        y[i] = (b[i] - sum) / l[[i, i]];
    }

    // Back substitution: Lᵀ x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let sum: f64 = ((i + 1)..n).map(|j| l[[j, i]] * x[j]).sum();
        x[i] = (y[i] - sum) / l[[i, i]];
    }

    Some(x)
}

/// Solve the (possibly singular) normal equations, adding ridge jitter
/// until the factorisation goes through.
fn solve_normal_equations(xtx: &Array2<f64>, xty: &Array1<f64>) -> Option<Array1<f64>> {
    if let Some(w) = cholesky_solve(xtx, xty) {
        return Some(w);
    }

    let n = xtx.nrows();
    let scale = (xtx.diag().iter().map(|v| v.abs()).sum::<f64>() / n.max(1) as f64).max(1.0);
    let mut lambda = JITTER_START * scale;

    for _ in 0..JITTER_STEPS {
        let mut reg = xtx.clone();
        for i in 0..n {
            reg[[i, i]] += lambda;
        }
        if let Some(w) = cholesky_solve(&reg, xty) {
            tracing::debug!("Normal equations were singular; solved with ridge jitter {:e}", lambda);
            return Some(w);
        }
        lambda *= 100.0;
    }
    None
}

/// Fitted (or not yet fitted) linear regression.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearRegression {
    /// One weight per feature, `None` until fitted.
    pub coefficients:  Option<Vec<f64>>,
    pub intercept:     f64,
    /// Column names the weights line up with.
    pub feature_names: Vec<String>,
}

impl LinearRegression {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature_names(mut self, names: Vec<String>) -> Self {
        self.feature_names = names;
        self
    }

    pub fn is_fitted(&self) -> bool {
        self.coefficients.is_some()
    }
}

impl Regressor for LinearRegression {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
        let (n_samples, n_features) = x.dim();
        if n_samples != y.len() {
            return Err(PipelineError::Training(format!(
                "feature matrix has {n_samples} rows but target has {}",
                y.len()
            )));
        }
        if n_samples == 0 {
            return Err(PipelineError::Training("cannot fit on an empty training set".into()));
        }
        if !self.feature_names.is_empty() && self.feature_names.len() != n_features {
            return Err(PipelineError::Training(format!(
                "{} feature names for {} feature columns",
                self.feature_names.len(),
                n_features
            )));
        }

        let x_mean = x
            .mean_axis(Axis(0))
            .ok_or_else(|| PipelineError::Training("empty feature matrix".into()))?;
        let y_mean = y.mean().unwrap_or(0.0);

        let xc = x - &x_mean.view().insert_axis(Axis(0));
        let yc = y - y_mean;

        let xtx = xc.t().dot(&xc);
        let xty = xc.t().dot(&yc);

        let w = solve_normal_equations(&xtx, &xty).ok_or_else(|| {
            PipelineError::Training("normal equations could not be solved".into())
        })?;

        if w.iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::Training("fit produced non-finite weights".into()));
        }

        self.intercept    = y_mean - w.dot(&x_mean);
        self.coefficients = Some(w.to_vec());
        Ok(())
    }

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        let coefficients = self
            .coefficients
            .as_ref()
            .ok_or_else(|| PipelineError::Training("model is not fitted".into()))?;

        if x.ncols() != coefficients.len() {
            return Err(PipelineError::Training(format!(
                "model expects {} features, got {}",
                coefficients.len(),
                x.ncols()
            )));
        }

        let w = Array1::from_vec(coefficients.clone());
        Ok(x.dot(&w) + self.intercept)
    }
}

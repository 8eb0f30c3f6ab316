// ============================================================
// Layer 5 — Cross-Validation
// ============================================================
// K-fold, contiguous and unshuffled:
//
//   n = 11, k = 5  →  folds of 3, 2, 2, 2, 2 rows
//                     (the first n % k folds take one extra)
//
// Each fold is scored with negative MAPE, so higher is better
// and callers negate the mean for display.

use ndarray::{Array1, Array2, Axis};

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Regressor;
use crate::ml::metrics::mean_absolute_percentage_error;

/// One train/validation partition by row index.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub train_indices: Vec<usize>,
    pub test_indices:  Vec<usize>,
}

/// Split `n_samples` rows into `k` contiguous folds.
pub fn k_fold(n_samples: usize, k: usize) -> Result<Vec<Fold>> {
    if k < 2 {
        return Err(PipelineError::Configuration(format!(
            "cross-validation needs at least 2 folds, got {k}"
        )));
    }
    if n_samples < k {
        return Err(PipelineError::Training(format!(
            "{n_samples} training row(s) cannot be split into {k} folds"
        )));
    }

    let base      = n_samples / k;
    let remainder = n_samples % k;
    let mut start = 0;
    let mut folds = Vec::with_capacity(k);

    for i in 0..k {
        let size = if i < remainder { base + 1 } else { base };
        let end  = start + size;
        folds.push(Fold {
            train_indices: (0..start).chain(end..n_samples).collect(),
            test_indices:  (start..end).collect(),
        });
        start = end;
    }
    Ok(folds)
}

/// Fit a fresh model per fold and return one negative-MAPE score per fold.
pub fn cross_val_neg_mape<M, F>(
    make_model: F,
    x: &Array2<f64>,
    y: &Array1<f64>,
    k: usize,
) -> Result<Vec<f64>>
where
    M: Regressor,
    F: Fn() -> M,
{
    let folds = k_fold(x.nrows(), k)?;
    let mut scores = Vec::with_capacity(folds.len());

    for (i, fold) in folds.iter().enumerate() {
        let x_train = x.select(Axis(0), &fold.train_indices);
        let y_train = y.select(Axis(0), &fold.train_indices);
        let x_test  = x.select(Axis(0), &fold.test_indices);
        let y_test  = y.select(Axis(0), &fold.test_indices);

        let mut model = make_model();
        model.fit(&x_train, &y_train)?;
        let predicted = model.predict(&x_test)?;

        let score = -mean_absolute_percentage_error(&y_test, &predicted);
        tracing::debug!("Fold {}/{}: neg MAPE = {:.6}", i + 1, k, score);
        scores.push(score);
    }
    Ok(scores)
}

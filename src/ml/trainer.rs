// ============================================================
// Layer 5 — Trainer
// ============================================================
//   1. k-fold cross-validation on the training split
//      (score = negative MAPE per fold)
//   2. fit OLS on the full training split
//   3. persist the fitted model through the ModelStore
//
// Returns the model together with the raw per-fold scores; the
// report negates their mean for display.

use ndarray::{Array1, Array2};

use crate::domain::error::Result;
use crate::domain::traits::Regressor;
use crate::infra::model_store::ModelStore;
use crate::ml::cross_validation::cross_val_neg_mape;
use crate::ml::linear::LinearRegression;
use crate::ml::metrics::{mean, std_dev};

/// Default number of cross-validation folds.
pub const DEFAULT_FOLDS: usize = 5;

/// Default artifact name.
pub const DEFAULT_MODEL_NAME: &str = "regLinear.sav";

pub struct TrainOutput {
    pub model:     LinearRegression,
    /// Negative MAPE per fold, as produced by cross-validation.
    pub cv_scores: Vec<f64>,
}

pub fn train(
    x_train:       &Array2<f64>,
    y_train:       &Array1<f64>,
    feature_names: &[String],
    folds:         usize,
    store:         &ModelStore,
    model_name:    &str,
) -> Result<TrainOutput> {
    tracing::info!("Evaluating the model with {}-fold cross-validation", folds);

    let names = feature_names.to_vec();
    let cv_scores = cross_val_neg_mape(
        || LinearRegression::new().with_feature_names(names.clone()),
        x_train,
        y_train,
        folds,
    )?;

    tracing::info!("CV MAPE mean: {:.6}", -mean(&cv_scores));
    tracing::info!("CV MAPE std:  {:.6}", std_dev(&cv_scores));

    let mut model = LinearRegression::new().with_feature_names(names);
    model.fit(x_train, y_train)?;
    tracing::debug!("Intercept: {}", model.intercept);

    store.save_model(&model, model_name)?;

    Ok(TrainOutput { model, cv_scores })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_train_scores_fits_and_persists() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();

        let x = Array2::from_shape_fn((40, 2), |(i, j)| if j == 0 { 40.0 + i as f64 } else { (i % 3) as f64 });
        let y = Array1::from_shape_fn(40, |i| 5_000.0 * x[[i, 0]] + 20_000.0 * x[[i, 1]] + 10_000.0);
        let names = vec!["area".to_string(), "quartos".to_string()];

        let out = train(&x, &y, &names, 5, &store, "regLinear.sav").unwrap();

        assert_eq!(out.cv_scores.len(), 5);
        assert!(out.cv_scores.iter().all(|s| *s <= 0.0 && *s > -1e-6));
        assert_eq!(store.load_model("regLinear.sav").unwrap(), out.model);
        assert_eq!(out.model.feature_names, names);
    }

    #[test]
    fn test_too_few_rows_for_folds_fails() {
        let dir   = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path()).unwrap();
        let x = Array2::from_shape_fn((3, 1), |(i, _)| i as f64);
        let y = Array1::from_vec(vec![1.0, 2.0, 3.0]);

        assert!(train(&x, &y, &["a".to_string()], 5, &store, "m.sav").is_err());
        assert!(!store.path_of("m.sav").exists());
    }
}

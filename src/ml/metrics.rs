// ============================================================
// Layer 5 — Regression Metrics
// ============================================================
//   MSE  = mean((y - ŷ)²)
//   RMSE = sqrt(MSE)
//   MAPE = mean(|y - ŷ| / max(|y|, ε))     ε = f64::EPSILON
//
// The ε floor keeps MAPE finite when an actual value is zero.
// All functions expect equal, non-zero lengths; callers check.

use ndarray::Array1;

pub fn mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    let diff = actual - predicted;
    diff.mapv(|d| d * d).mean().unwrap_or(f64::NAN)
}

pub fn root_mean_squared_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    mean_squared_error(actual, predicted).sqrt()
}

pub fn mean_absolute_percentage_error(actual: &Array1<f64>, predicted: &Array1<f64>) -> f64 {
    actual
        .iter()
        .zip(predicted.iter())
        .map(|(y, p)| (y - p).abs() / y.abs().max(f64::EPSILON))
        .sum::<f64>()
        / actual.len() as f64
}

/// Arithmetic mean; NaN for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n).
pub fn std_dev(values: &[f64]) -> f64 {
    let m = mean(values);
    (values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_error_metrics() {
        let y    = array![100.0, 200.0, 400.0];
        let yhat = array![110.0, 180.0, 400.0];

        assert!((mean_squared_error(&y, &yhat) - 500.0 / 3.0).abs() < 1e-12);
        assert!((root_mean_squared_error(&y, &yhat) - (500.0f64 / 3.0).sqrt()).abs() < 1e-12);
        // (0.1 + 0.1 + 0) / 3
        assert!((mean_absolute_percentage_error(&y, &yhat) - 0.2 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_mape_with_zero_actual_stays_finite() {
        let m = mean_absolute_percentage_error(&array![0.0], &array![1.0]);
        assert!(m.is_finite());
        assert!(m > 1e10);
    }

    #[test]
    fn test_mean_and_population_std() {
        let xs = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&xs), 5.0);
        assert_eq!(std_dev(&xs), 2.0);
    }
}

// ============================================================
// Layer 5 — ML / Model Layer
// ============================================================
// All numerics on ndarray matrices:
//
//   linear.rs            — OLS with intercept (normal equations)
//   cross_validation.rs  — contiguous k-fold, negative-MAPE scoring
//   metrics.rs           — MSE / RMSE / MAPE / mean / std
//   trainer.rs           — CV, final fit, persistence
//   report.rs            — held-out metrics, summary CSV, plot

/// Linear regression model
pub mod linear;

/// K-fold splitting and scoring
pub mod cross_validation;

/// Regression error metrics
pub mod metrics;

/// Cross-validate, fit and persist
pub mod trainer;

/// Validation report on the test split
pub mod report;

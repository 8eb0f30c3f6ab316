// ============================================================
// Layer 4 — Train/Test Splitter
// ============================================================
// Shuffles rows with a seeded RNG and splits them into a
// training set and a held-out test set.
//
//   - the last column is the target, all others are features
//   - ceil(n * test_fraction) rows go to the test set
//   - the same seed and frame always give the same partition
//
// Uses a Fisher-Yates shuffle (rand::seq::SliceRandom) driven by
// ChaCha8, which is reproducible across platforms.
//
// Reference: rand / rand_chacha crate documentation

use ndarray::{Array1, Array2};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use polars::prelude::*;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::column_names;

/// Default held-out share.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 6;

/// Features and target, partitioned.
#[derive(Debug, Clone)]
pub struct Split {
    pub feature_names: Vec<String>,
    pub x_train:       Array2<f64>,
    pub x_test:        Array2<f64>,
    pub y_train:       Array1<f64>,
    pub y_test:        Array1<f64>,
}

/// Shuffle `items` with `seed` and split off the test share.
///
/// Returns (train, test).
pub fn split_train_test<T>(mut items: Vec<T>, test_fraction: f64, seed: u64) -> Result<(Vec<T>, Vec<T>)> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(PipelineError::Configuration(format!(
            "test fraction must be strictly between 0 and 1, got {test_fraction}"
        )));
    }

    let total  = items.len();
    let n_test = (total as f64 * test_fraction).ceil() as usize;
    if n_test == 0 || n_test >= total {
        return Err(PipelineError::Configuration(format!(
            "cannot split {total} row(s) with test fraction {test_fraction}: one side would be empty"
        )));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let test = items.split_off(total - n_test);
    Ok((items, test))
}

/// Partition an encoded frame into train/test matrices.
pub fn split(df: &DataFrame, test_fraction: f64, seed: u64) -> Result<Split> {
    let (n_rows, n_cols) = df.shape();
    if n_cols < 2 {
        return Err(PipelineError::DataQuality(format!(
            "need at least one feature and a target, frame has {n_cols} column(s)"
        )));
    }

    // Check every column up front so the matrices below are total
    let mut columns: Vec<Vec<f64>> = Vec::with_capacity(n_cols);
    for column in df.get_columns() {
        if !column.dtype().is_primitive_numeric() {
            return Err(PipelineError::DataQuality(format!(
                "column '{}' holds text; encode it first",
                column.name()
            )));
        }
        let values = column.cast(&DataType::Float64)?;
        let values = values.f64()?;
        if let Some(r) = values.into_iter().position(|v| v.is_none()) {
            return Err(PipelineError::DataQuality(format!(
                "row {r}, column '{}' is missing",
                column.name()
            )));
        }
        columns.push(values.into_no_null_iter().collect());
    }

    let (train_idx, test_idx) = split_train_test((0..n_rows).collect::<Vec<usize>>(), test_fraction, seed)?;
    let n_features = n_cols - 1;

    let features = |rows: &[usize]| {
        Array2::from_shape_fn((rows.len(), n_features), |(i, j)| columns[j][rows[i]])
    };
    let target = |rows: &[usize]| {
        rows.iter().map(|&r| columns[n_features][r]).collect::<Array1<f64>>()
    };

    let mut names = column_names(df);
    names.truncate(n_features);

    let split = Split {
        feature_names: names,
        x_train:       features(&train_idx),
        x_test:        features(&test_idx),
        y_train:       target(&train_idx),
        y_test:        target(&test_idx),
    };

    tracing::info!("x_train shape: {:?}", split.x_train.dim());
    tracing::info!("x_test shape:  {:?}", split.x_test.dim());
    tracing::info!("y_train shape: ({},)", split.y_train.len());
    tracing::info!("y_test shape:  ({},)", split.y_test.len());

    Ok(split)
}

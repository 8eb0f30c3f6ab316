// ============================================================
// Layer 3 — Core Traits (Abstractions)
// ============================================================
// The seams between the pipeline and the outside world.
//
//   TableSource → CsvLoader reads a dataset from disk
//   SqlSource   → an open database connection runs a query
//   Connector   → opens SqlSource handles (ODBC in production,
//                 scripted fakes in tests)
//   Regressor   → LinearRegression; cross-validation is written
//                 against this trait
//
// Reference: Rust Book §10 (Traits: Defining Shared Behaviour)

use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;

use crate::domain::error::Result;
use crate::domain::secret::ConnectionSecret;

// ─── TableSource ──────────────────────────────────────────────────────────────
/// Any component that can produce a whole dataset in one call.
pub trait TableSource {
    fn load(&self) -> Result<DataFrame>;
}

// ─── SqlSource ────────────────────────────────────────────────────────────────
/// An open connection able to run a read query and materialise
/// every row it returns.
pub trait SqlSource {
    fn fetch(&mut self, query: &str) -> Result<DataFrame>;
}

// ─── Connector ────────────────────────────────────────────────────────────────
/// Opens connections from a secret. The handle may borrow from the
/// connector (an ODBC connection borrows its environment).
///
/// `connect` reports failures as plain strings: the retry loop in
/// `infra::connection` decides when a failure becomes fatal.
pub trait Connector {
    type Handle<'a>: SqlSource
    where
        Self: 'a;

    fn connect(&self, secret: &ConnectionSecret) -> std::result::Result<Self::Handle<'_>, String>;
}

// ─── Regressor ────────────────────────────────────────────────────────────────
/// A model that learns a real-valued target from a feature matrix.
pub trait Regressor {
    fn fit(&mut self, x: &Array2<f64>, y: &Array1<f64>) -> Result<()>;

    fn predict(&self, x: &Array2<f64>) -> Result<Array1<f64>>;
}

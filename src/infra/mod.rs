// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
// Everything that talks to the outside world:
//
//   logging.rs       — console + main.log sinks, one line format
//   connection.rs    — secret resolution and retrying connect
//   odbc.rs          — odbc-api Connector (feature "odbc")
//   model_store.rs   — bincode model artifact + JSON run config
//   report_writer.rs — results.csv
//   plot.rs          — pred_vs_real.png

/// Subscriber set-up for tracing
pub mod logging;

/// Connection secret and bounded-retry connect
pub mod connection;

/// ODBC implementation of the Connector trait
#[cfg(feature = "odbc")]
pub mod odbc;

/// Model and config persistence
pub mod model_store;

/// Validation summary CSV
pub mod report_writer;

/// Actual vs. predicted PNG
pub mod plot;

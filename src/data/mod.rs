// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// Everything between a raw source and model-ready matrices.
//
// Training path:
//
//   listings CSV
//       │
//       ▼
//   CsvLoader         → decodes windows-1252, parses into a DataFrame
//       │
//       ▼
//   remove_outliers   → drops rows outside Q1/Q3 ± k·IQR
//       │
//       ▼
//   encode            → one-hot text columns, target moved last
//       │
//       ▼
//   split             → seeded shuffle into train/test matrices
//
// Scoring path:
//
//   build_query → execute (over an open connection) → validate

/// Reads the listings CSV into a DataFrame
pub mod loader;

/// Builds the date-bounded scoring query
pub mod query;

/// Runs the scoring query and checks completeness
pub mod acquirer;

/// Quartile-based outlier removal
pub mod outliers;

/// One-hot encoding of categorical columns
pub mod encoder;

/// Seeded train/test split into ndarray matrices
pub mod splitter;

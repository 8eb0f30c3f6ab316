// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Each use case runs one pipeline end to end by calling into
// the data, ml and infra layers in order.
//
// Rules for this layer:
//   - No numerics here (Layer 5)
//   - No printing here (Layer 1)
//   - No direct file or database access (Layers 4 and 6)
//
// Errors from the lower layers arrive as PipelineError and are
// wrapped with anyhow context on the way up.

/// Offline training run: CSV → outliers → encoding → split → OLS → report
pub mod train_use_case;

/// Scoring data acquisition over a retrying database connection
pub mod scoring_use_case;

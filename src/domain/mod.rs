// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Types and traits shared by every other layer: the error
// type, DataFrame helpers, the redacted connection secret and
// the trait seams.
//
// No file I/O and no database access live here.

/// Error kinds and the crate-wide Result alias
pub mod error;

/// Type inference, null counting and previews over polars frames
pub mod frame;

/// Redacted ODBC connection string
pub mod secret;

/// Core abstractions that other layers implement
pub mod traits;

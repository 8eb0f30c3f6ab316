// ============================================================
// Layer 3 — DataFrame Helpers
// ============================================================
// Every stage of both pipelines passes a polars DataFrame
// around. Sources read cells as text first; infer_numeric()
// then turns each column that parses cleanly as numbers into
// Float64 and leaves the rest (and any column named as text)
// as String, so categorical labels keep their raw spelling.
//
//   "01", "1", "1.0" in a text column → three distinct labels
//   "50", "", "80"   in a free column → Float64 [50, null, 80]
//
// Null markers are the usual spreadsheet spellings plus the
// empty cell.

use polars::prelude::*;

use crate::domain::error::{PipelineError, Result};

/// Cell spellings read as null.
pub const NULL_MARKERS: &[&str] = &["NA", "N/A", "NaN", "nan", "NULL", "null"];

/// Build a frame from column-major text cells, then type it.
///
/// `None` is a missing cell.
pub fn from_text_columns(names: Vec<String>, cells: Vec<Vec<Option<String>>>) -> Result<DataFrame> {
    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| Series::new(name.into(), values).into())
        .collect::<Vec<Column>>();
    infer_numeric(DataFrame::new(columns)?, &[])
}

/// Convert clean text columns to Float64, except those in `text_columns`.
pub fn infer_numeric(df: DataFrame, text_columns: &[String]) -> Result<DataFrame> {
    let columns = df
        .get_columns()
        .iter()
        .map(|column| {
            let keep_text = text_columns.iter().any(|t| t == column.name().as_str());
            if keep_text || column.dtype() != &DataType::String {
                return column.clone();
            }
            match column.as_materialized_series().strict_cast(&DataType::Float64) {
                Ok(numbers) => numbers.into(),
                Err(_)      => column.clone(),
            }
        })
        .collect::<Vec<Column>>();

    Ok(DataFrame::new(columns)?)
}

/// Fail on the first infinite number, naming its column and row.
pub fn ensure_finite(df: &DataFrame) -> Result<()> {
    for column in df.get_columns() {
        if !column.dtype().is_float() {
            continue;
        }
        let values = column.cast(&DataType::Float64)?;
        let position = values
            .f64()?
            .into_iter()
            .position(|v| v.is_some_and(|x| !x.is_finite()));

        if let Some(row) = position {
            return Err(PipelineError::DataQuality(format!(
                "row {row}, column '{}' holds a non-finite number",
                column.name()
            )));
        }
    }
    Ok(())
}

/// Total null cells across the frame.
pub fn missing_count(df: &DataFrame) -> usize {
    df.get_columns().iter().map(|c| c.null_count()).sum()
}

/// Names of the numeric columns, in frame order.
pub fn numeric_columns(df: &DataFrame) -> Vec<String> {
    df.get_columns()
        .iter()
        .filter(|c| c.dtype().is_primitive_numeric())
        .map(|c| c.name().to_string())
        .collect()
}

pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names().iter().map(|s| s.to_string()).collect()
}

/// First `n` rows rendered for logs and stdout.
pub fn preview(df: &DataFrame, n: usize) -> String {
    df.head(Some(n)).to_string()
}

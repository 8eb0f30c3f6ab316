// ============================================================
// Layer 4 — Categorical Encoder
// ============================================================
// One-hot encodes text columns so the linear model can use them.
//
// For each named column (in the order given):
//   - the column is removed
//   - polars to_dummies() builds one indicator column per
//     distinct label, named "<column>_<label>", appended in
//     sorted order
//   - indicator cells are 1.0 / 0.0; a missing cell gets all 0.0
//     (the "<column>_null" indicator polars adds is dropped)
//
// Labels are the raw text of the cell, so "01" and "1" are two
// categories.
//
// Afterwards the target column is moved to the end so the
// splitter can treat "last column" as the label.
//
// Example (column "region" with values A, B):
//
//   region  area  valor         area  valor  region_A  region_B
//   A       50    200     →     50    ...    1         0
//   B       80    350           80    ...    0         1
//
//   ...then valor is moved last.

use polars::prelude::*;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::{column_names, preview};

/// Expand `categorical` into indicator columns and move `target` last.
pub fn encode(df: DataFrame, categorical: &[String], target: &str) -> Result<DataFrame> {
    tracing::info!("Encoding categorical columns: {:?}", categorical);

    let mut out = df;
    for name in categorical {
        let column = out.column(name).map_err(|_| {
            tracing::error!("Categorical column '{}' not found", name);
            PipelineError::Configuration(format!("categorical column '{name}' is not in the dataset"))
        })?;

        let labels    = column.as_materialized_series().cast(&DataType::String)?;
        let has_nulls = labels.null_count() > 0;
        let null_name = format!("{name}_null");

        let mut indicators = labels
            .to_dummies(Some("_"), false)?
            .get_columns()
            .iter()
            .filter(|c| !(has_nulls && c.name().as_str() == null_name))
            .map(|c| c.cast(&DataType::Float64))
            .collect::<PolarsResult<Vec<Column>>>()?;
        indicators.sort_by(|a, b| a.name().cmp(b.name()));

        out = out.drop(name)?;
        out.hstack_mut(&indicators)?;
    }

    if out.column(target).is_err() {
        tracing::error!("Target column '{}' not found", target);
        return Err(PipelineError::Configuration(format!(
            "target column '{target}' is not in the dataset"
        )));
    }
    let mut order: Vec<String> = column_names(&out).into_iter().filter(|c| c != target).collect();
    order.push(target.to_string());
    let out = out.select(order)?;

    tracing::info!("Encoded frame shape: {:?}", out.shape());
    tracing::debug!("\n{}", preview(&out, 5));
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regions() -> DataFrame {
        DataFrame::new(vec![
            Series::new("valor".into(), &[200.0, 350.0, 120.0]).into(),
            Series::new("region".into(), &[Some("B"), Some("A"), Some("B")]).into(),
            Series::new("area".into(), &[50.0, 80.0, 30.0]).into(),
        ])
        .unwrap()
    }

    fn row(df: &DataFrame, i: usize) -> Vec<f64> {
        df.get_columns()
            .iter()
            .map(|c| c.f64().unwrap().get(i).unwrap())
            .collect()
    }

    #[test]
    fn test_two_values_make_two_indicators() {
        let out = encode(regions(), &["region".to_string()], "valor").unwrap();

        assert_eq!(column_names(&out), vec!["area", "region_A", "region_B", "valor"]);
        assert_eq!(out.height(), 3);
        assert_eq!(row(&out, 0), vec![50.0, 0.0, 1.0, 200.0]);
        assert_eq!(row(&out, 1)[1], 1.0);
    }

    #[test]
    fn test_target_moves_last_without_categoricals() {
        let out = encode(regions(), &[], "valor").unwrap();
        assert_eq!(column_names(&out).last().unwrap(), "valor");
        assert_eq!(out.width(), 3);
    }

    #[test]
    fn test_missing_category_gets_all_zeros() {
        let df = DataFrame::new(vec![
            Series::new("valor".into(), &[200.0, 350.0, 90.0]).into(),
            Series::new("region".into(), &[Some("B"), Some("A"), None]).into(),
            Series::new("area".into(), &[50.0, 80.0, 20.0]).into(),
        ])
        .unwrap();

        let out = encode(df, &["region".to_string()], "valor").unwrap();
        assert_eq!(column_names(&out), vec!["area", "region_A", "region_B", "valor"]);
        assert_eq!(row(&out, 2), vec![20.0, 0.0, 0.0, 90.0]);
    }

    #[test]
    fn test_labels_keep_their_spelling() {
        let df = DataFrame::new(vec![
            Series::new("zona".into(), &["01", "1", "1.0", "01"]).into(),
            Series::new("valor".into(), &[1.0, 2.0, 3.0, 4.0]).into(),
        ])
        .unwrap();

        let out = encode(df, &["zona".to_string()], "valor").unwrap();
        assert_eq!(column_names(&out), vec!["zona_01", "zona_1", "zona_1.0", "valor"]);
        assert_eq!(row(&out, 3), vec![1.0, 0.0, 0.0, 4.0]);
    }

    #[test]
    fn test_unknown_columns_fail() {
        let err = encode(regions(), &["bairro".to_string()], "valor").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));

        let err = encode(regions(), &[], "preco").unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}

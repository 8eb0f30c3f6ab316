// ============================================================
// Layer 4 — Dataset Loader
// ============================================================
// Reads the listings CSV into a polars DataFrame.
//
// The source file is exported from a spreadsheet in a legacy
// Windows code page, so the bytes are decoded with encoding_rs
// first (label configurable, "windows-1252" by default) and the
// resulting UTF-8 text is handed to the polars CSV reader.
//
// Every cell is read as text. infer_numeric() then converts the
// columns that parse cleanly, skipping the ones named as text
// so category labels such as "01" survive untouched. Numbers
// too large for f64 ("1e400") or spelled "inf" are rejected
// with the offending cell named.
//
// Reference: polars CsvReadOptions documentation
//            encoding_rs crate documentation

use std::{fs, io::Cursor, path::PathBuf};

use encoding_rs::Encoding;
use polars::prelude::*;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::{ensure_finite, infer_numeric, preview, NULL_MARKERS};
use crate::domain::traits::TableSource;

/// Loads a comma-separated file with a header row.
pub struct CsvLoader {
    path:         PathBuf,
    encoding:     String,
    text_columns: Vec<String>,
}

impl CsvLoader {
    pub fn new(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Self {
            path:         path.into(),
            encoding:     encoding.into(),
            text_columns: Vec::new(),
        }
    }

    /// Columns that stay text even when every value looks numeric.
    pub fn with_text_columns(mut self, columns: &[String]) -> Self {
        self.text_columns = columns.to_vec();
        self
    }
}

impl TableSource for CsvLoader {
    fn load(&self) -> Result<DataFrame> {
        tracing::info!("Reading dataset from '{}'", self.path.display());

        let encoding = Encoding::for_label(self.encoding.as_bytes()).ok_or_else(|| {
            PipelineError::Configuration(format!("unknown text encoding '{}'", self.encoding))
        })?;

        let bytes = fs::read(&self.path).map_err(|e| {
            tracing::error!("Cannot read dataset '{}': {}", self.path.display(), e);
            PipelineError::io(&self.path, e)
        })?;

        let (text, _, had_errors) = encoding.decode(&bytes);
        if had_errors {
            tracing::warn!(
                "'{}' contained bytes that are not valid {}; they were replaced",
                self.path.display(),
                encoding.name()
            );
        }

        let df = parse_csv(&text, &self.text_columns)?;
        let (rows, cols) = df.shape();
        tracing::info!("Loaded {} rows x {} columns", rows, cols);
        tracing::info!("\n{}", preview(&df, 5));
        Ok(df)
    }
}

/// Parse already-decoded CSV text into a typed DataFrame.
pub fn parse_csv(text: &str, text_columns: &[String]) -> Result<DataFrame> {
    let markers = NULL_MARKERS.iter().map(|m| PlSmallStr::from(*m)).collect();
    let parse_opts = CsvParseOptions::default()
        .with_null_values(Some(NullValues::AllColumns(markers)));

    let mut df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .with_parse_options(parse_opts)
        .into_reader_with_file_handle(Cursor::new(text.as_bytes()))
        .finish()?;

    let trimmed: Vec<String> = df.get_column_names().iter().map(|h| h.trim().to_string()).collect();
    df.set_column_names(trimmed)?;

    let df = infer_numeric(df, text_columns)?;
    ensure_finite(&df)?;
    Ok(df)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::frame::{column_names, missing_count};
    use std::io::Write;

    #[test]
    fn test_parse_csv_infers_types() {
        let df = parse_csv("area,bairro,valor\n50,Centro,200000\n,Praia,350000\n", &[]).unwrap();
        assert_eq!(column_names(&df), vec!["area", "bairro", "valor"]);
        assert_eq!(df.column("area").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("bairro").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("area").unwrap().f64().unwrap().get(0), Some(50.0));
        assert_eq!(missing_count(&df), 1);
    }

    #[test]
    fn test_na_markers_read_as_missing() {
        let df = parse_csv("area,valor\nNA,1\n3,NaN\n", &[]).unwrap();
        assert_eq!(df.column("area").unwrap().dtype(), &DataType::Float64);
        assert_eq!(missing_count(&df), 2);
    }

    #[test]
    fn test_text_columns_keep_leading_zeros() {
        let df = parse_csv("zona,valor\n01,10\n1,20\n", &["zona".to_string()]).unwrap();
        let zona = df.column("zona").unwrap().str().unwrap();
        assert_eq!(zona.get(0), Some("01"));
        assert_eq!(zona.get(1), Some("1"));
    }

    #[test]
    fn test_non_finite_numbers_name_the_cell() {
        for bad in ["inf", "1e400"] {
            let text = format!("area,valor\n50,100\n60,{bad}\n");
            let err  = parse_csv(&text, &[]).unwrap_err();
            assert!(
                matches!(err, PipelineError::DataQuality(ref m) if m.contains("'valor'") && m.contains("row 1")),
                "{bad} was not rejected: {err}"
            );
        }
    }

    #[test]
    fn test_load_decodes_windows_1252() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // 0xE7 = ç, 0xE3 = ã in windows-1252
        file.write_all(b"tipo de constru\xe7\xe3o,valor\nCasa,100\n").unwrap();

        let df = CsvLoader::new(file.path(), "windows-1252").load().unwrap();
        assert_eq!(column_names(&df)[0], "tipo de construção");
        assert_eq!(df.column("valor").unwrap().f64().unwrap().get(0), Some(100.0));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = CsvLoader::new("does/not/exist.csv", "windows-1252").load().unwrap_err();
        assert!(matches!(err, PipelineError::Io { .. }));
    }

    #[test]
    fn test_unknown_encoding_is_configuration_error() {
        let err = CsvLoader::new("whatever.csv", "klingon-1").load().unwrap_err();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }
}

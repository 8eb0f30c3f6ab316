// ============================================================
// Layer 6 — ODBC Connector
// ============================================================
// Production Connector built on odbc-api. Behind the default
// `odbc` cargo feature because it links against the system
// ODBC driver manager (unixODBC / iODBC / Windows ODBC).
//
// Each connection borrows the Environment owned by the
// connector, so a handle can never outlive it. Dropping the
// handle disconnects.
//
// Every column is fetched as narrow text and decoded with the
// configured code page (windows-1252 unless told otherwise),
// then typed with the same inference the CSV loader applies.
// SQL NULL → null. A cell longer than the text buffer is a
// QueryError rather than a silently truncated value.
//
// Reference: odbc-api crate documentation (TextRowSet example)

use encoding_rs::Encoding;
use odbc_api::{
    buffers::TextRowSet, Connection, ConnectionOptions, Cursor, Environment, ResultSetMetadata,
};
use polars::prelude::DataFrame;

use crate::domain::error::{PipelineError, Result};
use crate::domain::frame::from_text_columns;
use crate::domain::secret::ConnectionSecret;
use crate::domain::traits::{Connector, SqlSource};

/// Rows fetched per round trip.
const BATCH_SIZE: usize = 5000;

/// Upper bound for a single text cell, in bytes.
const MAX_CELL_BYTES: usize = 4096;

pub struct OdbcConnector {
    env:      Environment,
    encoding: &'static Encoding,
}

impl OdbcConnector {
    /// `encoding` is a WHATWG label for the server's narrow text.
    pub fn new(encoding: &str) -> Result<Self> {
        let encoding = Encoding::for_label(encoding.as_bytes()).ok_or_else(|| {
            PipelineError::Configuration(format!("unknown text encoding '{encoding}'"))
        })?;
        let env = Environment::new().map_err(|e| {
            PipelineError::Configuration(format!("cannot initialise the ODBC environment: {e}"))
        })?;
        Ok(Self { env, encoding })
    }
}

impl Connector for OdbcConnector {
    type Handle<'a> = OdbcHandle<'a>
    where
        Self: 'a;

    fn connect(&self, secret: &ConnectionSecret) -> std::result::Result<OdbcHandle<'_>, String> {
        self.env
            .connect_with_connection_string(secret.expose(), ConnectionOptions::default())
            .map(|connection| OdbcHandle { connection, encoding: self.encoding })
            .map_err(|e| e.to_string())
    }
}

/// An open ODBC connection.
pub struct OdbcHandle<'env> {
    connection: Connection<'env>,
    encoding:   &'static Encoding,
}

impl SqlSource for OdbcHandle<'_> {
    fn fetch(&mut self, query: &str) -> Result<DataFrame> {
        let query_err = |e: odbc_api::Error| PipelineError::Query(e.to_string());

        let Some(mut cursor) = self.connection.execute(query, (), None).map_err(query_err)? else {
            // Statement produced no result set
            return Ok(DataFrame::empty());
        };

        let names: Vec<String> = cursor
            .column_names()
            .map_err(query_err)?
            .collect::<std::result::Result<_, _>>()
            .map_err(query_err)?;
        let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); names.len()];

        let buffer = TextRowSet::for_cursor(BATCH_SIZE, &mut cursor, Some(MAX_CELL_BYTES))
            .map_err(query_err)?;
        let mut row_set_cursor = cursor.bind_buffer(buffer).map_err(query_err)?;

        while let Some(batch) = row_set_cursor.fetch_with_truncation_check(true).map_err(query_err)? {
            for (col, column) in cells.iter_mut().enumerate() {
                for row in 0..batch.num_rows() {
                    column.push(batch.at(col, row).map(|bytes| decode_cell(self.encoding, bytes)));
                }
            }
        }

        from_text_columns(names, cells)
    }
}

fn decode_cell(encoding: &'static Encoding, bytes: &[u8]) -> String {
    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    if had_errors {
        tracing::warn!("Replaced bytes that are not valid {} in a fetched cell", encoding.name());
    }
    text.into_owned()
}

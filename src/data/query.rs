// ============================================================
// Layer 4 — Query Builder
// ============================================================
// Reads the scoring SELECT from a template file and appends a
// closed date-range predicate on the [date] column:
//
//   <template>WHERE [date] >='<start>' and [date] <='<end>'
//
// The template must not carry its own WHERE clause. The text is
// appended verbatim, so a template ending in a space or newline
// keeps it. Both dates must be ISO dates and are re-checked here
// before they are spliced into SQL.

use std::{fs, path::Path};

use chrono::NaiveDate;

use crate::domain::error::{PipelineError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Load the template at `template_path` and bound it by date.
pub fn build_query(template_path: &Path, start: &str, end: &str) -> Result<String> {
    let template = fs::read_to_string(template_path).map_err(|e| {
        tracing::error!("Cannot read query template '{}': {}", template_path.display(), e);
        PipelineError::Configuration(format!(
            "query template '{}' is unavailable: {e}",
            template_path.display()
        ))
    })?;

    let query = with_date_range(&template, start, end)?;
    tracing::debug!("Query: {}", query);
    Ok(query)
}

/// Append the date-range predicate to an in-memory template.
pub fn with_date_range(template: &str, start: &str, end: &str) -> Result<String> {
    let from = parse_date(start)?;
    let to   = parse_date(end)?;
    if from > to {
        return Err(PipelineError::Configuration(format!(
            "start date {start} is after end date {end}"
        )));
    }

    Ok(format!("{template}WHERE [date] >='{start}' and [date] <='{end}'"))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    // Round-trip so "2020-1-5" is rejected as well as garbage
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
        Ok(d) if d.format(DATE_FORMAT).to_string() == raw => Ok(d),
        _ => Err(PipelineError::Configuration(format!(
            "'{raw}' is not a date in YYYY-MM-DD form"
        ))),
    }
}

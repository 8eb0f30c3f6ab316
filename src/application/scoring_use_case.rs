// ============================================================
// Layer 2 — ScoringUseCase
// ============================================================
// Acquires the scoring dataset:
//
//   Step 1: Resolve the connection secret  (Layer 6 - infra)
//   Step 2: Build the date-bounded query   (Layer 4 - data)
//   Step 3: Connect with bounded retry     (Layer 6 - infra)
//   Step 4: Run the query                  (Layer 4 - data)
//   Step 5: Check completeness             (Layer 4 - data)
//
// The connection handle lives only inside step 3–4's block and
// is dropped (disconnected) as soon as the rows are in memory,
// on success and on error alike.
//
// Steps 1–4 are fatal on error. An incomplete dataset is not:
// it comes back as ScoringOutcome::Incomplete and the caller
// skips whatever would have consumed it.

use std::{path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use polars::prelude::DataFrame;
use serde::{Deserialize, Serialize};

use crate::data::acquirer::{execute, validate, Checked};
use crate::data::query::build_query;
use crate::domain::traits::Connector;
use crate::infra::connection::{open_connection_with, resolve_secret, RetryPolicy, SecretSource};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    pub secret_var:       String,
    pub secret_file:      Option<PathBuf>,
    pub query_path:       PathBuf,
    pub start_date:       String,
    pub end_date:         String,
    pub attempts:         u32,
    pub retry_delay_secs: u64,
    /// Code page of the server's narrow text columns.
    pub db_encoding:      String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            secret_var:       crate::infra::connection::DEFAULT_SECRET_VAR.to_string(),
            secret_file:      None,
            query_path:       PathBuf::from("query_odbc.txt"),
            start_date:       "2020-10-01".to_string(),
            end_date:         "2020-11-22".to_string(),
            attempts:         6,
            retry_delay_secs: 5,
            db_encoding:      "windows-1252".to_string(),
        }
    }
}

impl ScoringConfig {
    pub fn secret_source(&self) -> SecretSource {
        SecretSource { env_var: self.secret_var.clone(), file: self.secret_file.clone() }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            attempts: self.attempts,
            delay:    Duration::from_secs(self.retry_delay_secs),
        }
    }
}

/// Result of a scoring run that got as far as running the query.
#[derive(Debug, Clone)]
pub enum ScoringOutcome {
    Ready(DataFrame),
    Incomplete { missing_cells: usize },
}

pub struct ScoringUseCase<C> {
    config:    ScoringConfig,
    connector: C,
}

impl<C: Connector> ScoringUseCase<C> {
    pub fn new(config: ScoringConfig, connector: C) -> Self {
        Self { config, connector }
    }

    pub fn execute(&self) -> Result<ScoringOutcome> {
        self.execute_with_sleep(std::thread::sleep)
    }

    /// Same as execute() with an injectable retry sleep.
    pub fn execute_with_sleep<S: FnMut(Duration)>(&self, sleep: S) -> Result<ScoringOutcome> {
        let cfg = &self.config;

        // ── Step 1: Secret ────────────────────────────────────────────────────
        let secret = resolve_secret(&cfg.secret_source()).context("cannot resolve connection secret")?;

        // ── Step 2: Query ─────────────────────────────────────────────────────
        let query = build_query(&cfg.query_path, &cfg.start_date, &cfg.end_date)
            .context("cannot build scoring query")?;

        // ── Steps 3–4: Connect, fetch, disconnect ─────────────────────────────
        let policy = cfg.retry_policy();
        tracing::info!(
            "Opening database connection ({} tries, {:?} apart)",
            policy.tries(),
            policy.delay
        );
        let frame = {
            let mut handle = open_connection_with(&self.connector, &secret, policy, sleep)
                .context("cannot connect to the scoring database")?;
            execute(&query, &mut handle).context("scoring query failed")?
        };
        tracing::debug!("Database connection closed");

        // ── Step 5: Completeness ──────────────────────────────────────────────
        Ok(match validate(frame) {
            Checked::Complete(frame)              => ScoringOutcome::Ready(frame),
            Checked::Incomplete { missing_cells } => ScoringOutcome::Incomplete { missing_cells },
        })
    }
}

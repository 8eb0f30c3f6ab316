// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with clap and hands each subcommand
// to its use case in Layer 2.
//
//   1. `scoring`  — acquire and check the scoring dataset
//   2. `training` — fit and evaluate the price model
//
// This is the only layer that prints to stdout.

pub mod commands;

use std::{io::Write, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::Level;

use commands::{Commands, ScoringArgs, TrainArgs};

use crate::application::scoring_use_case::{ScoringConfig, ScoringOutcome, ScoringUseCase};
use crate::application::train_use_case::TrainUseCase;
use crate::domain::frame::preview;
use crate::domain::traits::Connector;
use crate::infra::logging::LogConfig;

#[derive(Parser, Debug)]
#[command(
    name = "property-valuation",
    version,
    about = "Acquire scoring data and train a linear real-estate price model."
)]
pub struct Cli {
    /// Append DEBUG-level logs to this file
    #[arg(long, global = true, default_value = "main.log")]
    pub log_file: PathBuf,

    /// Log DEBUG on the console as well
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            console_level: if self.verbose { Level::DEBUG } else { Level::INFO },
            file:          Some(self.log_file.clone()),
            ..LogConfig::default()
        }
    }

    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Scoring(args)  => run_scoring(args),
            Commands::Training(args) => run_training(args),
        }
    }
}

#[cfg(feature = "odbc")]
fn run_scoring(args: ScoringArgs) -> Result<()> {
    use crate::infra::odbc::OdbcConnector;

    let connector = OdbcConnector::new(&args.db_encoding)?;
    run_scoring_with(&args, connector, &mut std::io::stdout().lock())
}

#[cfg(not(feature = "odbc"))]
fn run_scoring(_args: ScoringArgs) -> Result<()> {
    use crate::domain::error::PipelineError;

    Err(PipelineError::Configuration(
        "scoring needs a database driver: rebuild with the `odbc` feature".into(),
    )
    .into())
}

/// Acquire the scoring data through `connector` and print a preview to `out`.
///
/// Incomplete data is not an error: the preview is skipped.
pub fn run_scoring_with<C: Connector>(args: &ScoringArgs, connector: C, out: &mut impl Write) -> Result<()> {
    tracing::info!("Starting scoring data acquisition");
    let use_case = ScoringUseCase::new(ScoringConfig::from(args), connector);

    match use_case.execute()? {
        ScoringOutcome::Ready(frame) => {
            let (rows, cols) = frame.shape();
            writeln!(out, "Acquired {rows} rows x {cols} columns")?;
            writeln!(out, "{}", preview(&frame, args.preview))?;
        }
        ScoringOutcome::Incomplete { missing_cells } => {
            tracing::warn!(
                "Scoring data has {} missing value(s); skipping preview",
                missing_cells
            );
        }
    }
    Ok(())
}

fn run_training(args: TrainArgs) -> Result<()> {
    tracing::info!("Starting training on '{}'", args.data.display());

    let summary = TrainUseCase::new(args.into()).execute()?;

    println!("Removed {} outlier row(s)", summary.removed_outliers);
    println!("Model saved to {}", summary.model_path.display());
    match summary.report {
        Some(report) => println!("{}", report.to_table_string()),
        None         => println!("Performance report unavailable, see the log"),
    }
    Ok(())
}

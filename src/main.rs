#![allow(dead_code)]

mod cli;
mod application;
mod domain;
mod data;
mod ml;
mod infra;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use domain::error::PipelineError;
use infra::logging::init_logging;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_config())?;

    let result = cli.run();
    if let Err(e) = &result {
        match e.downcast_ref::<PipelineError>() {
            Some(pe) => tracing::error!("{:?} failure: {:#}", pe.kind(), e),
            None     => tracing::error!("Pipeline failed: {:#}", e),
        }
    }
    result
}

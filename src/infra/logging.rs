// ============================================================
// Layer 6 — Logging Setup
// ============================================================
// Installs the process subscriber once, at start-up, with two
// sinks:
//
//   console → INFO and above (RUST_LOG overrides)
//   file    → DEBUG and above, appended to main.log
//
// Both sinks share one line format:
//
//   2020-11-22 14:03:51 property_valuation::data::loader INFO     Loaded 7412 rows x 9 columns
//   └ timestamp ──────┘ └ target (≥12 wide) ─────────┘ └ level ┘ └ message
//
// Components log through the tracing macros; nothing else in
// the crate touches the subscriber.

use std::{
    fmt,
    fs::{self, OpenOptions},
    path::PathBuf,
    sync::Mutex,
};

use chrono::Local;
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    filter::LevelFilter,
    fmt::{format::Writer, FmtContext, FormatEvent, FormatFields, MakeWriter},
    layer::SubscriberExt,
    registry::LookupSpan,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

use crate::domain::error::{PipelineError, Result};

const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Where and how verbosely to log.
#[derive(Debug, Clone)]
pub struct LogConfig {
    pub console_level: Level,
    /// `None` disables the file sink.
    pub file:          Option<PathBuf>,
    pub file_level:    Level,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            console_level: Level::INFO,
            file:          Some(PathBuf::from("main.log")),
            file_level:    Level::DEBUG,
        }
    }
}

/// `timestamp target level message`
pub struct LineFormat;

impl<S, N> FormatEvent<S, N> for LineFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let meta = event.metadata();
        write!(
            writer,
            "{} {:<12} {:<8} ",
            Local::now().format(DATE_FORMAT),
            meta.target(),
            level_name(meta.level())
        )?;
        ctx.field_format().format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}

fn level_name(level: &Level) -> &'static str {
    match *level {
        Level::TRACE => "TRACE",
        Level::DEBUG => "DEBUG",
        Level::INFO  => "INFO",
        Level::WARN  => "WARNING",
        Level::ERROR => "ERROR",
    }
}

/// Install the global subscriber. Call once, before any pipeline work.
pub fn init_logging(config: &LogConfig) -> Result<()> {
    build_subscriber(config, std::io::stderr)?
        .try_init()
        .map_err(|e| PipelineError::Configuration(format!("logging already initialised: {e}")))
}

/// Compose the console and file sinks without installing them.
///
/// The console writes to `console_writer`; the file sink, if any, is
/// opened in append mode (parent directories are created).
pub fn build_subscriber<W>(config: &LogConfig, console_writer: W) -> Result<impl Subscriber + Send + Sync + 'static>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let console_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(config.console_level).into()));

    let console = tracing_subscriber::fmt::layer()
        .event_format(LineFormat)
        .with_writer(console_writer)
        .with_filter(console_filter);

    let file_layer = match &config.file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| PipelineError::io(parent, e))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| PipelineError::io(path, e))?;

            Some(
                tracing_subscriber::fmt::layer()
                    .event_format(LineFormat)
                    .with_ansi(false)
                    .with_writer(Mutex::new(file))
                    .with_filter(LevelFilter::from_level(config.file_level)),
            )
        }
        None => None,
    };

    Ok(tracing_subscriber::registry().with(console).with(file_layer))
}

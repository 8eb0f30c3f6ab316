// ============================================================
// Layer 1 — CLI Commands and Arguments
// ============================================================
// Defines the two subcommands, `scoring` and `training`, and
// their flags. Every flag has a default, so both subcommands
// run with no arguments at all.

use std::path::PathBuf;

use clap::{Args, Subcommand};

use crate::application::scoring_use_case::ScoringConfig;
use crate::application::train_use_case::TrainConfig;
use crate::data::{outliers, splitter};
use crate::infra::connection::DEFAULT_SECRET_VAR;
use crate::ml::trainer;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Pull the scoring dataset from the database and check it for gaps
    Scoring(ScoringArgs),

    /// Train the price model on the listings CSV and write the report
    Training(TrainArgs),
}

#[derive(Args, Debug)]
pub struct ScoringArgs {
    /// Environment variable holding the ODBC connection string
    #[arg(long, default_value = DEFAULT_SECRET_VAR)]
    pub secret_var: String,

    /// File to read the connection string from when the variable is unset
    #[arg(long)]
    pub secret_file: Option<PathBuf>,

    /// SQL template; the date filter is appended to it
    #[arg(long, default_value = "query_odbc.txt")]
    pub query: PathBuf,

    /// First day included (YYYY-MM-DD)
    #[arg(long, default_value = "2020-10-01")]
    pub start: String,

    /// Last day included (YYYY-MM-DD)
    #[arg(long, default_value = "2020-11-22")]
    pub end: String,

    /// Retry bound: the connection is tried `attempts - 1` times
    #[arg(long, default_value_t = 6)]
    pub attempts: u32,

    /// Seconds to wait between connection tries
    #[arg(long, default_value_t = 5)]
    pub retry_delay: u64,

    /// Code page of the database's text columns (any WHATWG label)
    #[arg(long, default_value = "windows-1252")]
    pub db_encoding: String,

    /// Rows to print from the acquired dataset
    #[arg(long, default_value_t = 5)]
    pub preview: usize,
}

impl From<&ScoringArgs> for ScoringConfig {
    fn from(a: &ScoringArgs) -> Self {
        ScoringConfig {
            secret_var:       a.secret_var.clone(),
            secret_file:      a.secret_file.clone(),
            query_path:       a.query.clone(),
            start_date:       a.start.clone(),
            end_date:         a.end.clone(),
            attempts:         a.attempts,
            retry_delay_secs: a.retry_delay,
            db_encoding:      a.db_encoding.clone(),
        }
    }
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Listings CSV
    #[arg(long, default_value = "data/precos-imoveis-vitoria-2020.csv")]
    pub data: PathBuf,

    /// Text encoding of the CSV (any WHATWG label)
    #[arg(long, default_value = "windows-1252")]
    pub encoding: String,

    /// Categorical column to one-hot encode (repeatable)
    #[arg(long = "categorical", default_values_t = [
        "bairro".to_string(),
        "tipo de construção".to_string(),
    ])]
    pub categorical: Vec<String>,

    /// Column to predict
    #[arg(long, default_value = "valor")]
    pub target: String,

    /// IQR multiplier for the outlier fences
    #[arg(long, default_value_t = outliers::DEFAULT_K)]
    pub outlier_k: f64,

    /// Share of rows held out for the test split
    #[arg(long, default_value_t = splitter::DEFAULT_TEST_FRACTION)]
    pub test_fraction: f64,

    /// Shuffle seed for the split
    #[arg(long, default_value_t = splitter::DEFAULT_SEED)]
    pub seed: u64,

    /// Number of cross-validation folds
    #[arg(long, default_value_t = trainer::DEFAULT_FOLDS)]
    pub folds: usize,

    /// Directory for the model artifact and train_config.json
    #[arg(long, default_value = ".")]
    pub model_dir: PathBuf,

    /// File name of the model artifact
    #[arg(long, default_value = trainer::DEFAULT_MODEL_NAME)]
    pub model_name: String,

    /// Summary metrics CSV
    #[arg(long, default_value = "results.csv")]
    pub results: PathBuf,

    /// Actual vs. predicted PNG
    #[arg(long, default_value = "pred_vs_real.png")]
    pub plot: PathBuf,
}

impl From<TrainArgs> for TrainConfig {
    fn from(a: TrainArgs) -> Self {
        TrainConfig {
            data_path:     a.data,
            encoding:      a.encoding,
            categorical:   a.categorical,
            target:        a.target,
            outlier_k:     a.outlier_k,
            test_fraction: a.test_fraction,
            seed:          a.seed,
            folds:         a.folds,
            model_dir:     a.model_dir,
            model_name:    a.model_name,
            results_path:  a.results,
            plot_path:     a.plot,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use clap::Parser;

    #[test]
    fn test_training_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["property-valuation", "training"]).unwrap();
        let Commands::Training(args) = cli.command else { panic!("expected training") };
        assert_eq!(TrainConfig::from(args), TrainConfig::default());
    }

    #[test]
    fn test_scoring_defaults_match_config_defaults() {
        let cli = Cli::try_parse_from(["property-valuation", "scoring"]).unwrap();
        let Commands::Scoring(args) = cli.command else { panic!("expected scoring") };
        assert_eq!(ScoringConfig::from(&args), ScoringConfig::default());
        assert_eq!(args.preview, 5);
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "property-valuation",
            "--log-file",
            "run.log",
            "scoring",
            "--start",
            "2021-01-01",
            "--attempts",
            "3",
        ])
        .unwrap();
        assert_eq!(cli.log_file, PathBuf::from("run.log"));
        let Commands::Scoring(args) = cli.command else { panic!("expected scoring") };
        let cfg = ScoringConfig::from(&args);
        assert_eq!(cfg.start_date, "2021-01-01");
        assert_eq!(cfg.attempts, 3);
    }

    #[test]
    fn test_categorical_is_repeatable() {
        let cli = Cli::try_parse_from([
            "property-valuation",
            "training",
            "--categorical",
            "bairro",
        ])
        .unwrap();
        let Commands::Training(args) = cli.command else { panic!("expected training") };
        assert_eq!(args.categorical, vec!["bairro".to_string()]);
    }
}

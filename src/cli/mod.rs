//! Command-line parsing.
//!
//! Argument parsing and command dispatch are kept apart from the matrix code.
//! `app::rewrite_args` maps the plain `estimate TRAIN DATA` form onto the `fit`
//! subcommand before clap sees it.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::OutputFormat;
use crate::math::DEFAULT_PIVOT_EPSILON;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "estimate",
    version,
    about = "Fit a linear regression with the normal equations and predict new rows"
)]
pub struct Cli {
    /// Verbosity on stderr (-v info, -vv debug, -vvv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fit on a training file and print one prediction per row of the data file.
    Fit(FitArgs),
    /// Apply a saved model JSON to a data file.
    Predict(PredictArgs),
    /// Write a synthetic training/data file pair from a known linear model.
    Generate(GenerateArgs),
}

#[derive(Debug, Parser, Clone)]
pub struct FitArgs {
    /// Training file: identifier, attribute count, row count, then rows of attributes + target.
    #[arg(value_name = "TRAIN")]
    pub train: PathBuf,

    /// Data file: identifier, attribute count, row count, then rows of attributes.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Prediction output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Rounded)]
    pub format: OutputFormat,

    /// Relative pivot tolerance for the Gram matrix inversion (0 rejects only exact zeros).
    #[arg(long, default_value_t = DEFAULT_PIVOT_EPSILON)]
    pub pivot_epsilon: f64,

    /// Print the weights and fit diagnostics before the predictions.
    #[arg(long)]
    pub summary: bool,

    /// Verify the weights against an SVD least-squares solve.
    #[arg(long)]
    pub cross_check: bool,

    /// Maximum relative weight difference accepted by `--cross-check`.
    #[arg(long, default_value_t = 1e-6)]
    pub cross_check_tolerance: f64,

    /// Export predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Export the fitted model to JSON.
    #[arg(long = "export-model", value_name = "JSON")]
    pub export_model: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct PredictArgs {
    /// Model JSON produced by `estimate fit --export-model`.
    #[arg(long, value_name = "JSON")]
    pub model: PathBuf,

    /// Data file to predict.
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Prediction output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Rounded)]
    pub format: OutputFormat,

    /// Export predictions to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,
}

#[derive(Debug, Parser, Clone)]
pub struct GenerateArgs {
    /// Output path for the training file.
    #[arg(long, value_name = "TRAIN")]
    pub train: PathBuf,

    /// Output path for the data file.
    #[arg(long, value_name = "DATA")]
    pub data: PathBuf,

    /// Also write the generating weights and noise-free data targets as JSON.
    #[arg(long, value_name = "JSON")]
    pub truth: Option<PathBuf>,

    /// Number of attributes per row.
    #[arg(short = 'a', long, default_value_t = 4)]
    pub attributes: usize,

    /// Number of training rows.
    #[arg(long, default_value_t = 50)]
    pub train_rows: usize,

    /// Number of data rows.
    #[arg(long, default_value_t = 10)]
    pub test_rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Generating weights, intercept first (comma separated). Random when omitted.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub weights: Option<Vec<f64>>,

    /// Standard deviation of Gaussian noise on training targets.
    #[arg(long, default_value_t = 0.0)]
    pub noise: f64,

    /// Lower bound for attribute values.
    #[arg(long, default_value_t = 0.0, allow_hyphen_values = true)]
    pub feature_min: f64,

    /// Upper bound for attribute values.
    #[arg(long, default_value_t = 100.0, allow_hyphen_values = true)]
    pub feature_max: f64,
}

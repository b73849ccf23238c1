//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - rewrites and parses CLI arguments
//! - sets up logging on stderr
//! - runs the fit / predict / generate commands
//! - prints predictions on stdout and writes optional exports

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{Command, FitArgs, GenerateArgs, PredictArgs};
use crate::domain::{EstimateConfig, GenerateConfig, PredictConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `estimate` binary.
pub fn run() -> Result<(), AppError> {
    // `estimate TRAIN DATA` is the primary interface, but clap needs a
    // subcommand name, so the argv list is rewritten to `estimate fit TRAIN DATA`.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);
    init_logging(cli.verbose);

    match cli.command {
        Command::Fit(args) => handle_fit(args),
        Command::Predict(args) => handle_predict(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // A second initialisation (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn handle_fit(args: FitArgs) -> Result<(), AppError> {
    let config = estimate_config_from_args(&args);
    let run = pipeline::run_estimate(&config)?;

    if config.summary {
        print!(
            "{}",
            crate::report::format_fit_summary(
                &run.training,
                &run.estimate.model,
                &run.diagnostics,
                run.cross_check
            )
        );
    }
    print!(
        "{}",
        crate::report::format_predictions(&run.estimate.predictions, config.format)
    );

    // Optional exports.
    if let Some(path) = &config.export_predictions {
        crate::io::export::write_predictions_csv(path, &run.test, &run.estimate.predictions)?;
        info!(path = %path.display(), "wrote predictions CSV");
    }
    if let Some(path) = &config.export_model {
        let model = crate::io::model::model_file(&run.training, &run.estimate.model, &run.diagnostics);
        crate::io::model::write_model_json(path, &model)?;
        info!(path = %path.display(), "wrote model JSON");
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = PredictConfig {
        model_path: args.model,
        data_path: args.data,
        format: args.format,
        export_predictions: args.export,
    };
    let out = pipeline::run_predict(&config)?;

    print!("{}", crate::report::format_predictions(&out.predictions, config.format));

    if let Some(path) = &config.export_predictions {
        crate::io::export::write_predictions_csv(path, &out.test, &out.predictions)?;
        info!(path = %path.display(), "wrote predictions CSV");
    }
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let config = generate_config_from_args(&args);
    let data = crate::data::generate_datasets(&config)?;

    crate::io::dataset::write_training_file(&config.train_path, &data.training)?;
    crate::io::dataset::write_test_file(&config.data_path, &data.test)?;
    if let Some(path) = &config.truth_path {
        crate::io::model::write_truth_json(path, &data.truth)?;
    }

    info!(
        train = %config.train_path.display(),
        data = %config.data_path.display(),
        weights = ?data.truth.weights,
        "wrote synthetic datasets"
    );
    Ok(())
}

pub fn estimate_config_from_args(args: &FitArgs) -> EstimateConfig {
    EstimateConfig {
        train_path: args.train.clone(),
        data_path: args.data.clone(),
        format: args.format,
        pivot_epsilon: args.pivot_epsilon,
        summary: args.summary,
        cross_check: args.cross_check,
        cross_check_tolerance: args.cross_check_tolerance,
        export_predictions: args.export.clone(),
        export_model: args.export_model.clone(),
    }
}

pub fn generate_config_from_args(args: &GenerateArgs) -> GenerateConfig {
    GenerateConfig {
        train_path: args.train.clone(),
        data_path: args.data.clone(),
        truth_path: args.truth.clone(),
        num_attributes: args.attributes,
        train_rows: args.train_rows,
        test_rows: args.test_rows,
        seed: args.seed,
        weights: args.weights.clone(),
        noise_sigma: args.noise,
        feature_min: args.feature_min,
        feature_max: args.feature_max,
    }
}

/// Rewrite argv so `estimate TRAIN DATA` means `estimate fit TRAIN DATA`.
///
/// Rules:
/// - `estimate`                          -> unchanged (clap prints usage)
/// - `estimate --help/--version/-h/-V`   -> unchanged
/// - `estimate fit|predict|generate ...` -> unchanged
/// - `estimate TRAIN DATA ...`           -> `estimate fit TRAIN DATA ...`
/// - `estimate --summary TRAIN DATA`     -> `estimate fit --summary TRAIN DATA`
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "fit" | "predict" | "generate");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "fit".to_string());
    argv
}

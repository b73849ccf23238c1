//! Shared run logic for the `fit` and `predict` commands.
//!
//! Workflow for `fit`:
//! read training file -> read data header -> schema check -> read data rows
//! -> normal-equation fit -> predict -> finiteness check -> diagnostics
//! -> optional SVD cross-check
//!
//! The front-end in `app` only prints and exports what this returns.

use std::path::Path;

use tracing::{info, warn};

use crate::domain::{EstimateConfig, FitDiagnostics, ModelFile, PredictConfig, TestSet, TrainingSet};
use crate::error::{AppError, EXIT_NUMERIC};
use crate::fit::{Estimate, OlsPipeline, check_schema, diagnose};
use crate::io::ingest::{parse_header, parse_test, read_dataset_text, read_training_file};
use crate::io::model::{fitted_model_from_file, read_model_json};
use crate::math::{Matrix, max_relative_difference, solve_least_squares};

/// All computed outputs of a single `estimate fit` run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub training: TrainingSet,
    pub test: TestSet,
    pub estimate: Estimate,
    pub diagnostics: FitDiagnostics,
    /// Max relative weight difference against the SVD solve, when requested.
    pub cross_check: Option<f64>,
}

/// Outputs of `estimate predict`.
#[derive(Debug, Clone)]
pub struct PredictOutput {
    pub model: ModelFile,
    pub test: TestSet,
    pub predictions: Matrix,
}

/// Execute the full fit-and-predict pipeline.
pub fn run_estimate(config: &EstimateConfig) -> Result<RunOutput, AppError> {
    let training = read_training_file(&config.train_path)?;
    info!(
        identifier = %training.identifier,
        attributes = training.num_attributes,
        rows = training.num_rows(),
        "loaded training data"
    );

    let test = read_test_checked(&config.data_path, training.num_attributes)?;
    info!(
        identifier = %test.identifier,
        attributes = test.num_attributes,
        rows = test.num_rows(),
        "loaded data to predict"
    );

    run_estimate_with_data(config, training, test)
}

/// Execute the pipeline on already parsed datasets.
pub fn run_estimate_with_data(
    config: &EstimateConfig,
    training: TrainingSet,
    test: TestSet,
) -> Result<RunOutput, AppError> {
    let pipeline = OlsPipeline::new(config.pivot_epsilon);
    let estimate = pipeline.run(&training, &test)?;
    ensure_finite(&estimate.predictions)?;
    info!(weights = ?estimate.model.weight_values(), "fitted normal equations");

    let diagnostics = diagnose(&training, &estimate.model)?;
    info!(
        sse = diagnostics.sse,
        rmse = diagnostics.rmse,
        r_squared = ?diagnostics.r_squared,
        "training fit"
    );

    let cross_check = if config.cross_check {
        Some(verify_against_svd(&training, &estimate, config.cross_check_tolerance)?)
    } else {
        None
    };

    Ok(RunOutput {
        training,
        test,
        estimate,
        diagnostics,
        cross_check,
    })
}

/// Apply a saved model to a data file.
pub fn run_predict(config: &PredictConfig) -> Result<PredictOutput, AppError> {
    let model = read_model_json(&config.model_path)?;
    let fitted = fitted_model_from_file(&model)?;
    info!(
        training = %model.training_identifier,
        attributes = model.num_attributes,
        "loaded model"
    );

    let test = read_test_checked(&config.data_path, fitted.num_attributes)?;
    let predictions = OlsPipeline::default().predict(&fitted, &test)?;
    ensure_finite(&predictions)?;

    Ok(PredictOutput {
        model,
        test,
        predictions,
    })
}

/// Read a data file, comparing its declared attribute count before parsing any rows.
fn read_test_checked(path: &Path, expected_attributes: usize) -> Result<TestSet, AppError> {
    let source_name = path.display().to_string();
    let text = read_dataset_text(path)?;
    let header = parse_header(&source_name, &text)?;
    check_schema(expected_attributes, header.num_attributes)?;
    Ok(parse_test(&source_name, &text)?)
}

fn ensure_finite(predictions: &Matrix) -> Result<(), AppError> {
    if !predictions.is_finite() {
        return Err(AppError::new(
            EXIT_NUMERIC,
            "error: non-finite prediction (overflow in the fitted model).",
        ));
    }
    Ok(())
}

fn verify_against_svd(training: &TrainingSet, estimate: &Estimate, tolerance: f64) -> Result<f64, AppError> {
    let reference = solve_least_squares(&training.x, &training.y).ok_or_else(|| {
        AppError::new(EXIT_NUMERIC, "error: SVD cross-check could not solve the training system.")
    })?;
    let diff = max_relative_difference(&estimate.model.weights, &reference)?;
    if diff > tolerance {
        warn!(diff, tolerance, "normal equations disagree with SVD solve");
        return Err(AppError::new(
            EXIT_NUMERIC,
            format!(
                "error: normal-equation weights differ from the SVD solve by {diff:.3e} (tolerance {tolerance:.3e}); the Gram matrix is likely ill-conditioned."
            ),
        ));
    }
    Ok(diff)
}

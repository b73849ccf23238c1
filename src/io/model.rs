//! Read/write model JSON files.
//!
//! A model file is the portable form of a fit: the weight vector plus enough
//! metadata (attribute count, training identifier, diagnostics) to apply it to
//! a later test file with `estimate predict`. The schema is `domain::ModelFile`.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{FitDiagnostics, FittedModel, GeneratedTruth, ModelFile, TrainingSet};
use crate::error::{AppError, EXIT_INPUT};
use crate::math::Matrix;

/// Build the JSON representation of a fitted model.
pub fn model_file(training: &TrainingSet, model: &FittedModel, diagnostics: &FitDiagnostics) -> ModelFile {
    ModelFile {
        tool: "estimate".to_string(),
        trained_at: Utc::now(),
        training_identifier: training.identifier.clone(),
        num_attributes: model.num_attributes,
        weights: model.weight_values(),
        diagnostics: diagnostics.clone(),
    }
}

/// Write a model JSON file.
pub fn write_model_json(path: &Path, model: &ModelFile) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create model JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, model)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write model JSON: {e}")))?;
    Ok(())
}

/// Read a model JSON file.
pub fn read_model_json(path: &Path) -> Result<ModelFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to open model JSON '{}': {e}", path.display())))?;
    let model: ModelFile = serde_json::from_reader(file)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Invalid model JSON: {e}")))?;
    Ok(model)
}

/// Turn a model file back into weights the pipeline can apply.
pub fn fitted_model_from_file(model: &ModelFile) -> Result<FittedModel, AppError> {
    if model.num_attributes.checked_add(1) != Some(model.weights.len()) {
        return Err(AppError::new(
            EXIT_INPUT,
            format!(
                "Invalid model JSON: {} attribute(s) need one weight each plus the intercept, found {} weights.",
                model.num_attributes,
                model.weights.len()
            ),
        ));
    }
    if !model.weights.iter().all(|w| w.is_finite()) {
        return Err(AppError::new(EXIT_INPUT, "Invalid model JSON: non-finite weight."));
    }
    let weights = Matrix::column(&model.weights)?;
    Ok(FittedModel {
        num_attributes: model.num_attributes,
        weights,
    })
}

/// Write the parameters of a synthetic dataset pair.
pub fn write_truth_json(path: &Path, truth: &GeneratedTruth) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create truth JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, truth)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write truth JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_model_file(weights: Vec<f64>, num_attributes: usize) -> ModelFile {
        ModelFile {
            tool: "estimate".to_string(),
            trained_at: Utc::now(),
            training_identifier: "train".to_string(),
            num_attributes,
            weights,
            diagnostics: FitDiagnostics {
                n_rows: 3,
                sse: 0.0,
                rmse: 0.0,
                r_squared: Some(1.0),
            },
        }
    }

    #[test]
    fn model_json_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        write_model_json(&path, &sample_model_file(vec![1.0, 2.0], 1)).unwrap();

        let back = read_model_json(&path).unwrap();
        let fitted = fitted_model_from_file(&back).unwrap();
        assert_eq!(fitted.num_attributes, 1);
        assert_eq!(fitted.weight_values(), vec![1.0, 2.0]);
    }

    #[test]
    fn weight_count_must_match_attributes() {
        let err = fitted_model_from_file(&sample_model_file(vec![1.0, 2.0, 3.0], 1)).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn maximal_attribute_count_is_rejected_not_overflowed() {
        let err = fitted_model_from_file(&sample_model_file(vec![1.0], usize::MAX)).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }

    #[test]
    fn missing_model_file_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_model_json(&dir.path().join("nope.json")).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_INPUT);
    }
}

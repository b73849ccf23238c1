//! Write datasets in the training/test file format read by `ingest`.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::domain::{TestSet, TrainingSet};
use crate::error::{AppError, EXIT_INPUT};

/// Render a training set: header lines, then one record per line.
pub fn format_training(training: &TrainingSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", training.identifier);
    let _ = writeln!(out, "{}", training.num_attributes);
    let _ = writeln!(out, "{}", training.num_rows());
    for r in 0..training.num_rows() {
        let mut fields: Vec<String> = training.x.row(r)[1..].iter().map(|v| v.to_string()).collect();
        fields.push(training.y[(r, 0)].to_string());
        let _ = writeln!(out, "{}", fields.join(" "));
    }
    out
}

/// Render a test set: header lines, then one record per line.
pub fn format_test(test: &TestSet) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", test.identifier);
    let _ = writeln!(out, "{}", test.num_attributes);
    let _ = writeln!(out, "{}", test.num_rows());
    for r in 0..test.num_rows() {
        let fields: Vec<String> = test.x.row(r)[1..].iter().map(|v| v.to_string()).collect();
        let _ = writeln!(out, "{}", fields.join(" "));
    }
    out
}

pub fn write_training_file(path: &Path, training: &TrainingSet) -> Result<(), AppError> {
    fs::write(path, format_training(training))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write training file '{}': {e}", path.display())))
}

pub fn write_test_file(path: &Path, test: &TestSet) -> Result<(), AppError> {
    fs::write(path, format_test(test))
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write test file '{}': {e}", path.display())))
}

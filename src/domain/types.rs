//! Shared domain types.
//!
//! Datasets and fitted models are held as [`Matrix`] values so they can be fed
//! straight into the linear algebra core. The serializable file types at the
//! bottom of this module describe the JSON exports.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::math::Matrix;

/// A labeled dataset: design matrix `X` (bias column first) and targets `y`.
#[derive(Debug, Clone)]
pub struct TrainingSet {
    pub identifier: String,
    pub num_attributes: usize,
    /// `rows × (num_attributes + 1)`, column 0 is `1.0`.
    pub x: Matrix,
    /// `rows × 1`.
    pub y: Matrix,
}

impl TrainingSet {
    pub fn num_rows(&self) -> usize {
        self.x.rows()
    }
}

/// An unlabeled dataset with the same column layout as [`TrainingSet::x`].
#[derive(Debug, Clone)]
pub struct TestSet {
    pub identifier: String,
    pub num_attributes: usize,
    /// `rows × (num_attributes + 1)`, column 0 is `1.0`.
    pub x: Matrix,
}

impl TestSet {
    pub fn num_rows(&self) -> usize {
        self.x.rows()
    }
}

/// Fitted OLS weights. `weights[0]` is the intercept.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedModel {
    pub num_attributes: usize,
    /// `(num_attributes + 1) × 1`.
    pub weights: Matrix,
}

impl FittedModel {
    pub fn intercept(&self) -> f64 {
        self.weights[(0, 0)]
    }

    pub fn weight_values(&self) -> Vec<f64> {
        self.weights.as_slice().to_vec()
    }
}

/// Goodness of fit on the training rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitDiagnostics {
    pub n_rows: usize,
    pub sse: f64,
    pub rmse: f64,
    /// `None` when the targets have zero variance.
    pub r_squared: Option<f64>,
}

/// How predictions are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Zero decimal places, one value per line.
    Rounded,
    /// Shortest representation that round-trips the `f64`.
    Full,
}

/// Resolved settings for `estimate fit`.
#[derive(Debug, Clone)]
pub struct EstimateConfig {
    pub train_path: PathBuf,
    pub data_path: PathBuf,
    pub format: OutputFormat,
    /// Relative pivot tolerance for Gauss-Jordan inversion.
    pub pivot_epsilon: f64,
    pub summary: bool,
    pub cross_check: bool,
    /// Maximum accepted relative weight difference for `cross_check`.
    pub cross_check_tolerance: f64,
    pub export_predictions: Option<PathBuf>,
    pub export_model: Option<PathBuf>,
}

/// Resolved settings for `estimate predict`.
#[derive(Debug, Clone)]
pub struct PredictConfig {
    pub model_path: PathBuf,
    pub data_path: PathBuf,
    pub format: OutputFormat,
    pub export_predictions: Option<PathBuf>,
}

/// Resolved settings for `estimate generate`.
#[derive(Debug, Clone)]
pub struct GenerateConfig {
    pub train_path: PathBuf,
    pub data_path: PathBuf,
    pub truth_path: Option<PathBuf>,
    pub num_attributes: usize,
    pub train_rows: usize,
    pub test_rows: usize,
    pub seed: u64,
    /// Intercept first. Drawn at random when `None`.
    pub weights: Option<Vec<f64>>,
    /// Standard deviation of the Gaussian noise added to training targets.
    pub noise_sigma: f64,
    pub feature_min: f64,
    pub feature_max: f64,
}

/// A saved model (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelFile {
    pub tool: String,
    pub trained_at: DateTime<Utc>,
    pub training_identifier: String,
    pub num_attributes: usize,
    /// Intercept first.
    pub weights: Vec<f64>,
    pub diagnostics: FitDiagnostics,
}

/// Parameters used to produce a synthetic dataset pair (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedTruth {
    pub seed: u64,
    pub num_attributes: usize,
    /// Intercept first.
    pub weights: Vec<f64>,
    pub noise_sigma: f64,
    /// Noise-free targets for each test row.
    pub test_targets: Vec<f64>,
}

//! Synthetic dataset generation from a known linear model.
//!
//! Features are drawn uniformly from `[feature_min, feature_max]` and rounded
//! to three decimals so generated files stay readable. Training targets are
//! `x·w + ε` with `ε ~ N(0, noise_sigma²)`; test rows carry no target, but
//! their noise-free values are returned in [`GeneratedTruth::test_targets`].

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{GenerateConfig, GeneratedTruth, TestSet, TrainingSet};
use crate::error::{AppError, EXIT_INPUT, EXIT_NUMERIC};
use crate::math::Matrix;

/// Range for randomly drawn intercepts.
const INTERCEPT_RANGE: f64 = 10.0;
/// Range for randomly drawn slopes.
const SLOPE_RANGE: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct SyntheticData {
    pub training: TrainingSet,
    pub test: TestSet,
    pub truth: GeneratedTruth,
}

pub fn generate_datasets(config: &GenerateConfig) -> Result<SyntheticData, AppError> {
    validate(config)?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let noise = Normal::new(0.0, config.noise_sigma)
        .map_err(|e| AppError::new(EXIT_NUMERIC, format!("Noise distribution error: {e}")))?;

    let weights = match &config.weights {
        Some(w) => w.clone(),
        None => random_weights(&mut rng, config.num_attributes),
    };

    let cols = config.num_attributes + 1;
    let train_x = random_design(&mut rng, config, config.train_rows);
    let train_y: Vec<f64> = (0..config.train_rows)
        .map(|r| dot(&train_x[r * cols..(r + 1) * cols], &weights) + noise.sample(&mut rng))
        .collect();

    let test_x = random_design(&mut rng, config, config.test_rows);
    let test_targets: Vec<f64> = (0..config.test_rows)
        .map(|r| dot(&test_x[r * cols..(r + 1) * cols], &weights))
        .collect();

    let training = TrainingSet {
        identifier: "train".to_string(),
        num_attributes: config.num_attributes,
        x: Matrix::from_vec(config.train_rows, cols, train_x)?,
        y: Matrix::from_vec(config.train_rows, 1, train_y)?,
    };
    let test = TestSet {
        identifier: "data".to_string(),
        num_attributes: config.num_attributes,
        x: Matrix::from_vec(config.test_rows, cols, test_x)?,
    };
    let truth = GeneratedTruth {
        seed: config.seed,
        num_attributes: config.num_attributes,
        weights,
        noise_sigma: config.noise_sigma,
        test_targets,
    };

    Ok(SyntheticData { training, test, truth })
}

fn validate(config: &GenerateConfig) -> Result<(), AppError> {
    if config.train_rows == 0 || config.test_rows == 0 {
        return Err(AppError::new(EXIT_INPUT, "Row counts must be > 0."));
    }
    let too_large = || AppError::new(EXIT_INPUT, "Requested dataset is too large.");
    let cols = config.num_attributes.checked_add(1).ok_or_else(too_large)?;
    if cols.checked_mul(config.train_rows.max(config.test_rows)).is_none() {
        return Err(too_large());
    }
    if config.train_rows < cols {
        return Err(AppError::new(
            EXIT_INPUT,
            format!(
                "Need at least {cols} training rows for {} attribute(s), got {}.",
                config.num_attributes, config.train_rows
            ),
        ));
    }
    if !(config.feature_min.is_finite() && config.feature_max.is_finite() && config.feature_max > config.feature_min)
    {
        return Err(AppError::new(EXIT_INPUT, "Invalid feature range for generation."));
    }
    if !(config.noise_sigma.is_finite() && config.noise_sigma >= 0.0) {
        return Err(AppError::new(EXIT_INPUT, "Noise sigma must be finite and >= 0."));
    }
    if let Some(w) = &config.weights {
        if w.len() != cols {
            return Err(AppError::new(
                EXIT_INPUT,
                format!("Expected {cols} weights (intercept first), got {}.", w.len()),
            ));
        }
        if !w.iter().all(|v| v.is_finite()) {
            return Err(AppError::new(EXIT_INPUT, "Weights must be finite."));
        }
    }
    Ok(())
}

fn random_weights(rng: &mut StdRng, num_attributes: usize) -> Vec<f64> {
    let mut w = Vec::with_capacity(num_attributes + 1);
    w.push(round3(rng.gen_range(-INTERCEPT_RANGE..=INTERCEPT_RANGE)));
    for _ in 0..num_attributes {
        w.push(round3(rng.gen_range(-SLOPE_RANGE..=SLOPE_RANGE)));
    }
    w
}

/// Row-major design values with the bias column filled in.
fn random_design(rng: &mut StdRng, config: &GenerateConfig, rows: usize) -> Vec<f64> {
    let mut out = Vec::with_capacity(rows * (config.num_attributes + 1));
    for _ in 0..rows {
        out.push(1.0);
        for _ in 0..config.num_attributes {
            out.push(round3(rng.gen_range(config.feature_min..=config.feature_max)));
        }
    }
    out
}

fn dot(row: &[f64], weights: &[f64]) -> f64 {
    row.iter().zip(weights).map(|(a, b)| a * b).sum()
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

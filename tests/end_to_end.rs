//! End-to-end runs through dataset files on disk.

use std::fs;
use std::path::Path;

use approx::assert_abs_diff_eq;

use ols_estimate::app::pipeline::{run_estimate, run_predict};
use ols_estimate::data::generate_datasets;
use ols_estimate::domain::{EstimateConfig, GenerateConfig, OutputFormat, PredictConfig};
use ols_estimate::error::{EXIT_INPUT, EXIT_NUMERIC, EXIT_SCHEMA, OlsError};
use ols_estimate::fit::OlsPipeline;
use ols_estimate::io::{
    model_file, read_test_file, read_training_file, write_model_json, write_test_file,
    write_training_file,
};
use ols_estimate::math::DEFAULT_PIVOT_EPSILON;
use ols_estimate::report::format_predictions;

fn config(dir: &Path) -> EstimateConfig {
    EstimateConfig {
        train_path: dir.join("train.txt"),
        data_path: dir.join("data.txt"),
        format: OutputFormat::Rounded,
        pivot_epsilon: DEFAULT_PIVOT_EPSILON,
        summary: false,
        cross_check: false,
        cross_check_tolerance: 1e-6,
        export_predictions: None,
        export_model: None,
    }
}

fn write_pair(dir: &Path, train: &str, data: &str) {
    fs::write(dir.join("train.txt"), train).unwrap();
    fs::write(dir.join("data.txt"), data).unwrap();
}

#[test]
fn fits_line_and_predicts_nine() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(dir.path(), "train\n1\n3\n1 3\n2 5\n3 7\n", "data\n1\n1\n4\n");

    let run = run_estimate(&config(dir.path())).unwrap();
    let w = run.estimate.model.weight_values();
    assert_abs_diff_eq!(w[0], 1.0, epsilon = 1e-9);
    assert_abs_diff_eq!(w[1], 2.0, epsilon = 1e-9);
    assert_eq!(
        format_predictions(&run.estimate.predictions, OutputFormat::Rounded),
        "9\n"
    );
}

#[test]
fn attribute_mismatch_is_a_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "train\n2\n3\n1 2 5\n2 1 4\n3 3 9\n",
        "data\n3\n1\n1 2 3\n",
    );

    let err = run_estimate(&config(dir.path())).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_SCHEMA);
    assert!(err.to_string().contains("schema mismatch"));
}

#[test]
fn identical_feature_columns_are_singular() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "train\n2\n4\n1 1 2\n2 2 4\n3 3 6\n5 5 10\n",
        "data\n2\n1\n4 4\n",
    );

    let err = run_estimate(&config(dir.path())).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_NUMERIC);
    assert!(err.to_string().contains("singular matrix"), "{err}");
}

#[test]
fn truncated_training_file_is_malformed() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(dir.path(), "train\n1\n3\n1 3\n2\n", "data\n1\n1\n4\n");

    let err = run_estimate(&config(dir.path())).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);
}

#[test]
fn generated_data_round_trips_through_files() {
    let dir = tempfile::tempdir().unwrap();
    let gen_config = GenerateConfig {
        train_path: dir.path().join("train.txt"),
        data_path: dir.path().join("data.txt"),
        truth_path: None,
        num_attributes: 3,
        train_rows: 40,
        test_rows: 6,
        seed: 11,
        weights: Some(vec![12.0, 1.5, -2.0, 0.25]),
        noise_sigma: 0.0,
        feature_min: 0.0,
        feature_max: 20.0,
    };
    let data = generate_datasets(&gen_config).unwrap();
    write_training_file(&gen_config.train_path, &data.training).unwrap();
    write_test_file(&gen_config.data_path, &data.test).unwrap();

    let mut cfg = config(dir.path());
    cfg.cross_check = true;
    let run = run_estimate(&cfg).unwrap();

    for (got, want) in run.estimate.model.weight_values().iter().zip([12.0, 1.5, -2.0, 0.25]) {
        assert_abs_diff_eq!(*got, want, epsilon = 1e-8);
    }
    for (r, want) in data.truth.test_targets.iter().enumerate() {
        assert_abs_diff_eq!(run.estimate.predictions[(r, 0)], *want, epsilon = 1e-7);
    }
    assert!(run.cross_check.unwrap() < 1e-6);
}

#[test]
fn saved_model_predicts_like_the_fit() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(
        dir.path(),
        "train\n2\n5\n1 2 8\n2 1 6.5\n3 5 18\n4 3 14.5\n0 7 22\n",
        "data\n2\n2\n1 1\n10 10\n",
    );

    let run = run_estimate(&config(dir.path())).unwrap();
    let model_path = dir.path().join("model.json");
    write_model_json(
        &model_path,
        &model_file(&run.training, &run.estimate.model, &run.diagnostics),
    )
    .unwrap();

    let out = run_predict(&PredictConfig {
        model_path,
        data_path: dir.path().join("data.txt"),
        format: OutputFormat::Full,
        export_predictions: None,
    })
    .unwrap();
    assert_eq!(out.predictions.shape(), (2, 1));
    for r in 0..2 {
        assert_abs_diff_eq!(
            out.predictions[(r, 0)],
            run.estimate.predictions[(r, 0)],
            epsilon = 1e-9
        );
    }
}

#[test]
fn pipeline_matches_file_readers() {
    let dir = tempfile::tempdir().unwrap();
    write_pair(dir.path(), "train 1 4 0 1 1 3 2 5 3 7", "data 1 2 10 -1");

    let training = read_training_file(&dir.path().join("train.txt")).unwrap();
    let test = read_test_file(&dir.path().join("data.txt")).unwrap();
    let estimate = OlsPipeline::default().run(&training, &test).unwrap();
    assert_abs_diff_eq!(estimate.predictions[(0, 0)], 21.0, epsilon = 1e-9);
    assert_abs_diff_eq!(estimate.predictions[(1, 0)], -1.0, epsilon = 1e-9);
    assert_eq!(
        format_predictions(&estimate.predictions, OutputFormat::Rounded),
        "21\n-1\n"
    );
}

#[test]
fn missing_data_file_is_reported_not_panicked() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("train.txt"), "train 1 2 1 1 2 2").unwrap();
    let err = run_estimate(&config(dir.path())).unwrap_err();
    assert_eq!(err.exit_code(), EXIT_INPUT);

    let direct = read_test_file(&dir.path().join("data.txt")).unwrap_err();
    assert!(matches!(direct, OlsError::MalformedInput { .. }));
}

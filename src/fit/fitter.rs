//! Normal-equation OLS pipeline.
//!
//! Given a design matrix `X` (bias column first) and targets `y`:
//!
//! ```text
//! Xᵗ   = transpose(X)
//! P    = Xᵗ · X            (Gram matrix)
//! P⁻¹  = invert(P)
//! R    = P⁻¹ · Xᵗ          (pseudo-inverse of X)
//! w    = R · y
//! ```
//!
//! and predictions for new rows are `X_test · w`. Every step returns a fresh
//! matrix; each intermediate is dropped as soon as the next step has consumed it.
//! Any failure aborts the fit and is tagged with the step name.

use tracing::debug;

use crate::domain::{FittedModel, TestSet, TrainingSet};
use crate::error::OlsError;
use crate::math::{DEFAULT_PIVOT_EPSILON, Matrix, invert, multiply, transpose};

pub const STEP_TRANSPOSE: &str = "transpose design matrix";
pub const STEP_GRAM: &str = "gram matrix XᵗX";
pub const STEP_INVERT: &str = "invert gram matrix";
pub const STEP_PSEUDO_INVERSE: &str = "pseudo-inverse (XᵗX)⁻¹Xᵗ";
pub const STEP_WEIGHTS: &str = "weights";
pub const STEP_PREDICT: &str = "predict";

/// Weights plus predictions for one train/apply run.
#[derive(Debug, Clone)]
pub struct Estimate {
    pub model: FittedModel,
    /// `test rows × 1`.
    pub predictions: Matrix,
}

/// Closed-form least squares via the normal equations.
#[derive(Debug, Clone, Copy)]
pub struct OlsPipeline {
    pivot_epsilon: f64,
}

impl Default for OlsPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_PIVOT_EPSILON)
    }
}

impl OlsPipeline {
    pub fn new(pivot_epsilon: f64) -> Self {
        Self { pivot_epsilon }
    }

    pub fn transpose_step(&self, x: &Matrix) -> Matrix {
        transpose(x)
    }

    pub fn gram_step(&self, xt: &Matrix, x: &Matrix) -> Result<Matrix, OlsError> {
        multiply(xt, x).map_err(|e| e.in_step(STEP_GRAM))
    }

    pub fn invert_step(&self, gram: &Matrix) -> Result<Matrix, OlsError> {
        invert(gram, self.pivot_epsilon).map_err(|e| e.in_step(STEP_INVERT))
    }

    pub fn pseudo_inverse_step(&self, gram_inv: &Matrix, xt: &Matrix) -> Result<Matrix, OlsError> {
        multiply(gram_inv, xt).map_err(|e| e.in_step(STEP_PSEUDO_INVERSE))
    }

    pub fn weights_step(&self, pseudo_inverse: &Matrix, y: &Matrix) -> Result<Matrix, OlsError> {
        multiply(pseudo_inverse, y).map_err(|e| e.in_step(STEP_WEIGHTS))
    }

    /// Solve `w = (XᵗX)⁻¹ Xᵗy`.
    pub fn solve(&self, x: &Matrix, y: &Matrix) -> Result<Matrix, OlsError> {
        if y.cols() != 1 || y.rows() != x.rows() {
            return Err(OlsError::DimensionMismatch {
                op: "solve",
                detail: format!(
                    "design matrix is {}x{} but targets are {}x{} (expected {}x1)",
                    x.rows(),
                    x.cols(),
                    y.rows(),
                    y.cols(),
                    x.rows()
                ),
            }
            .in_step(STEP_WEIGHTS));
        }

        let xt = self.transpose_step(x);
        debug!(rows = xt.rows(), cols = xt.cols(), "{STEP_TRANSPOSE}");

        let gram = self.gram_step(&xt, x)?;
        debug!(rows = gram.rows(), cols = gram.cols(), "{STEP_GRAM}");

        let gram_inv = self.invert_step(&gram)?;
        drop(gram);
        debug!(rows = gram_inv.rows(), cols = gram_inv.cols(), "{STEP_INVERT}");

        let pseudo_inverse = self.pseudo_inverse_step(&gram_inv, &xt)?;
        drop(gram_inv);
        drop(xt);
        debug!(
            rows = pseudo_inverse.rows(),
            cols = pseudo_inverse.cols(),
            "{STEP_PSEUDO_INVERSE}"
        );

        let w = self.weights_step(&pseudo_inverse, y)?;
        debug!(rows = w.rows(), "{STEP_WEIGHTS}");
        Ok(w)
    }

    /// Fit a model to a training set.
    pub fn fit(&self, training: &TrainingSet) -> Result<FittedModel, OlsError> {
        let weights = self.solve(&training.x, &training.y)?;
        Ok(FittedModel {
            num_attributes: training.num_attributes,
            weights,
        })
    }

    /// Apply a fitted model: `y_pred = X_test · w`.
    pub fn predict(&self, model: &FittedModel, test: &TestSet) -> Result<Matrix, OlsError> {
        check_schema(model.num_attributes, test.num_attributes)?;
        multiply(&test.x, &model.weights).map_err(|e| e.in_step(STEP_PREDICT))
    }

    /// Fit on `training` and predict `test`.
    ///
    /// The attribute counts are compared before any arithmetic happens.
    pub fn run(&self, training: &TrainingSet, test: &TestSet) -> Result<Estimate, OlsError> {
        check_schema(training.num_attributes, test.num_attributes)?;
        let model = self.fit(training)?;
        let predictions = self.predict(&model, test)?;
        Ok(Estimate { model, predictions })
    }
}

/// Fail with `SchemaMismatch` unless both datasets declare the same attribute count.
pub fn check_schema(training: usize, test: usize) -> Result<(), OlsError> {
    if training != test {
        return Err(OlsError::SchemaMismatch { training, test });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_abs_diff_eq;

    use super::*;

    fn training(num_attributes: usize, rows: &[Vec<f64>], y: &[f64]) -> TrainingSet {
        let with_bias: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| std::iter::once(1.0).chain(r.iter().copied()).collect())
            .collect();
        TrainingSet {
            identifier: "train".to_string(),
            num_attributes,
            x: Matrix::from_rows(&with_bias).unwrap(),
            y: Matrix::column(y).unwrap(),
        }
    }

    fn test_set(num_attributes: usize, rows: &[Vec<f64>]) -> TestSet {
        let with_bias: Vec<Vec<f64>> = rows
            .iter()
            .map(|r| std::iter::once(1.0).chain(r.iter().copied()).collect())
            .collect();
        TestSet {
            identifier: "data".to_string(),
            num_attributes,
            x: Matrix::from_rows(&with_bias).unwrap(),
        }
    }

    #[test]
    fn recovers_noise_free_line() {
        // y = 3 + 2x
        let xs: Vec<Vec<f64>> = (0..8).map(|i| vec![i as f64 * 0.5]).collect();
        let ys: Vec<f64> = xs.iter().map(|r| 3.0 + 2.0 * r[0]).collect();
        let model = OlsPipeline::default().fit(&training(1, &xs, &ys)).unwrap();

        assert_abs_diff_eq!(model.weights[(0, 0)], 3.0, epsilon = 1e-9);
        assert_abs_diff_eq!(model.weights[(1, 0)], 2.0, epsilon = 1e-9);
    }

    #[test]
    fn recovers_two_feature_plane() {
        // y = -1 + 0.5a + 4b
        let xs = vec![
            vec![1.0, 2.0],
            vec![2.0, 1.0],
            vec![3.0, 5.0],
            vec![4.0, 3.0],
            vec![0.0, 7.0],
        ];
        let ys: Vec<f64> = xs.iter().map(|r| -1.0 + 0.5 * r[0] + 4.0 * r[1]).collect();
        let model = OlsPipeline::default().fit(&training(2, &xs, &ys)).unwrap();
        let expected = [-1.0, 0.5, 4.0];
        for (got, want) in model.weight_values().iter().zip(expected) {
            assert_abs_diff_eq!(*got, want, epsilon = 1e-9);
        }
    }

    #[test]
    fn end_to_end_small_line() {
        let train = training(1, &[vec![1.0], vec![2.0], vec![3.0]], &[3.0, 5.0, 7.0]);
        let data = test_set(1, &[vec![4.0]]);

        let estimate = OlsPipeline::default().run(&train, &data).unwrap();
        assert_abs_diff_eq!(estimate.model.intercept(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(estimate.model.weights[(1, 0)], 2.0, epsilon = 1e-9);
        assert_eq!(estimate.predictions.shape(), (1, 1));
        assert_abs_diff_eq!(estimate.predictions[(0, 0)], 9.0, epsilon = 1e-9);
    }

    #[test]
    fn features_in_the_millions_fit() {
        // y = 1 + 2x; the bias pivot is tiny next to the sum of squares.
        let xs = [vec![1e6], vec![2e6], vec![3e6]];
        let ys: Vec<f64> = xs.iter().map(|r| 1.0 + 2.0 * r[0]).collect();
        let train = training(1, &xs, &ys);
        let data = test_set(1, &[vec![4e6]]);

        let estimate = OlsPipeline::default().run(&train, &data).unwrap();
        assert_abs_diff_eq!(estimate.model.intercept(), 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(estimate.model.weights[(1, 0)], 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(estimate.predictions[(0, 0)], 8_000_001.0, epsilon = 1e-4);
    }

    #[test]
    fn schema_mismatch_fails_before_fitting() {
        // The training set is singular; a schema error proves nothing was computed.
        let train = training(2, &[vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0]], &[1.0, 2.0, 3.0]);
        let data = test_set(3, &[vec![1.0, 2.0, 3.0]]);

        let err = OlsPipeline::default().run(&train, &data).unwrap_err();
        assert_eq!(err, OlsError::SchemaMismatch { training: 2, test: 3 });
    }

    #[test]
    fn duplicate_feature_columns_are_singular() {
        let xs = vec![vec![1.0, 1.0], vec![2.0, 2.0], vec![3.0, 3.0], vec![5.0, 5.0]];
        let train = training(2, &xs, &[2.0, 4.0, 6.0, 10.0]);
        let data = test_set(2, &[vec![4.0, 4.0]]);

        let err = OlsPipeline::default().run(&train, &data).unwrap_err();
        assert!(matches!(err.root(), OlsError::SingularMatrix { .. }));
        assert!(err.to_string().starts_with(STEP_INVERT));
    }

    #[test]
    fn bias_only_model_predicts_the_mean() {
        let train = TrainingSet {
            identifier: "train".to_string(),
            num_attributes: 0,
            x: Matrix::from_row_slice(4, 1, &[1.0; 4]).unwrap(),
            y: Matrix::column(&[1.0, 2.0, 3.0, 6.0]).unwrap(),
        };
        let data = TestSet {
            identifier: "data".to_string(),
            num_attributes: 0,
            x: Matrix::from_row_slice(2, 1, &[1.0; 2]).unwrap(),
        };
        let estimate = OlsPipeline::default().run(&train, &data).unwrap();
        assert_abs_diff_eq!(estimate.predictions[(0, 0)], 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(estimate.predictions[(1, 0)], 3.0, epsilon = 1e-12);
    }

    #[test]
    fn target_length_mismatch_is_a_dimension_error() {
        let x = Matrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0]).unwrap();
        let y = Matrix::column(&[1.0, 2.0]).unwrap();
        let err = OlsPipeline::default().solve(&x, &y).unwrap_err();
        assert!(matches!(err.root(), OlsError::DimensionMismatch { op: "solve", .. }));
    }

    #[test]
    fn steps_compose_to_solve() {
        let x = Matrix::from_row_slice(3, 2, &[1.0, 1.0, 1.0, 2.0, 1.0, 3.0]).unwrap();
        let y = Matrix::column(&[3.0, 5.0, 7.0]).unwrap();
        let p = OlsPipeline::default();

        let xt = p.transpose_step(&x);
        let gram = p.gram_step(&xt, &x).unwrap();
        assert_eq!(gram.as_slice(), &[3.0, 6.0, 6.0, 14.0]);
        let gram_inv = p.invert_step(&gram).unwrap();
        let pinv = p.pseudo_inverse_step(&gram_inv, &xt).unwrap();
        assert_eq!(pinv.shape(), (2, 3));
        let w = p.weights_step(&pinv, &y).unwrap();

        assert_eq!(w, p.solve(&x, &y).unwrap());
    }
}

//! Reference least-squares solve used to cross-check the normal equations.
//!
//! The fitter itself uses `w = (XᵗX)⁻¹ Xᵗy`, which squares the condition number
//! of `X`. Solving the same problem through an SVD of `X` avoids forming the
//! Gram matrix, so comparing the two catches fits that inverted a badly
//! conditioned `XᵗX` without tripping the pivot check.

use crate::error::OlsError;
use crate::math::Matrix;

/// Singular values below this are treated as zero by the SVD solve.
const SVD_EPS: f64 = 1e-10;

/// Solve `min ‖x·w - y‖²` with nalgebra's SVD.
///
/// Returns `None` if the SVD solve fails or yields non-finite weights.
pub fn solve_least_squares(x: &Matrix, y: &Matrix) -> Option<Matrix> {
    if y.cols() != 1 || x.rows() != y.rows() {
        return None;
    }
    let svd = x.to_dmatrix().svd(true, true);
    let w = svd.solve(&y.to_dmatrix(), SVD_EPS).ok()?;
    let w = Matrix::from_dmatrix(&w).ok()?;
    w.is_finite().then_some(w)
}

/// Largest relative difference between two weight vectors.
///
/// Each component is scaled by `max(|a|, |b|, 1)` so weights near zero are
/// compared absolutely.
pub fn max_relative_difference(a: &Matrix, b: &Matrix) -> Result<f64, OlsError> {
    if a.shape() != b.shape() {
        return Err(OlsError::DimensionMismatch {
            op: "compare weights",
            detail: format!(
                "{}x{} vs {}x{}",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols()
            ),
        });
    }
    Ok(a.as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(x, y)| (x - y).abs() / x.abs().max(y.abs()).max(1.0))
        .fold(0.0, f64::max))
}

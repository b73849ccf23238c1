//! Gauss-Jordan inversion.
//!
//! The input is reduced to the identity on a private copy while the same row
//! operations turn an identity matrix into the inverse. Pivots are taken from
//! the diagonal in order (no row exchanges), so the caller must supply a
//! matrix whose leading principal minors are all non-singular. The Gram matrix
//! `XᵗX` of a full-rank design matrix is positive definite and satisfies this.

use tracing::trace;

use crate::error::OlsError;
use crate::math::Matrix;

/// Default relative pivot tolerance used by [`invert`].
pub const DEFAULT_PIVOT_EPSILON: f64 = 1e-12;

/// Invert a square matrix, rejecting pivot `p` when its reduced value is
/// `|pivot| <= epsilon * |m[p][p]|`.
///
/// Each pivot is measured against its own original diagonal entry, so columns
/// of very different magnitude do not mask one another. `epsilon = 0.0` only
/// rejects exact zeros. Non-finite pivots are always rejected.
pub fn invert(m: &Matrix, epsilon: f64) -> Result<Matrix, OlsError> {
    if !m.is_square() {
        return Err(OlsError::DimensionMismatch {
            op: "invert",
            detail: format!("matrix must be square, got {}x{}", m.rows(), m.cols()),
        });
    }

    let n = m.rows();
    // NaN or negative epsilon degrade to exact-zero detection.
    let epsilon = epsilon.max(0.0);
    let mut work = m.clone();
    let mut inv = Matrix::identity(n)?;
    let mut pivot_work = vec![0.0; n];
    let mut pivot_inv = vec![0.0; n];

    // Forward phase: unit diagonal, zeros below it.
    for p in 0..n {
        let f = work[(p, p)];
        let tolerance = epsilon * m[(p, p)].abs();
        trace!(pivot_row = p, pivot = f, tolerance, "gauss-jordan pivot");
        if !f.is_finite() || f.abs() <= tolerance {
            return Err(OlsError::SingularMatrix {
                pivot_row: p,
                value: f,
                tolerance,
            });
        }

        for v in work.row_mut(p) {
            *v /= f;
        }
        for v in inv.row_mut(p) {
            *v /= f;
        }

        pivot_work.copy_from_slice(work.row(p));
        pivot_inv.copy_from_slice(inv.row(p));
        for i in p + 1..n {
            let g = work[(i, p)];
            eliminate(work.row_mut(i), &pivot_work, g);
            eliminate(inv.row_mut(i), &pivot_inv, g);
        }
    }

    // Backward phase: zeros above the diagonal.
    for p in (0..n).rev() {
        pivot_work.copy_from_slice(work.row(p));
        pivot_inv.copy_from_slice(inv.row(p));
        for i in (0..p).rev() {
            let g = work[(i, p)];
            eliminate(work.row_mut(i), &pivot_work, g);
            eliminate(inv.row_mut(i), &pivot_inv, g);
        }
    }

    Ok(inv)
}

/// `target -= factor * pivot`
fn eliminate(target: &mut [f64], pivot: &[f64], factor: f64) {
    for (v, p) in target.iter_mut().zip(pivot) {
        *v -= factor * p;
    }
}

//! Transpose and matrix product.

use crate::error::OlsError;
use crate::math::Matrix;

/// Return the `C × R` transpose of an `R × C` matrix.
pub fn transpose(src: &Matrix) -> Matrix {
    let (rows, cols) = src.shape();
    let mut dest = Matrix::zeroed(cols, rows);
    write_transpose(src, &mut dest);
    dest
}

/// Write the transpose of `src` into `dest`, which must already be `C × R`.
///
/// Every cell of `dest` is overwritten.
pub fn transpose_into(src: &Matrix, dest: &mut Matrix) -> Result<(), OlsError> {
    let (rows, cols) = src.shape();
    if dest.shape() != (cols, rows) {
        return Err(OlsError::DimensionMismatch {
            op: "transpose",
            detail: format!(
                "source is {rows}x{cols}, destination must be {cols}x{rows} but is {}x{}",
                dest.rows(),
                dest.cols()
            ),
        });
    }
    write_transpose(src, dest);
    Ok(())
}

fn write_transpose(src: &Matrix, dest: &mut Matrix) {
    for i in 0..src.cols() {
        for j in 0..src.rows() {
            dest[(i, j)] = src[(j, i)];
        }
    }
}

/// Matrix product `a · b`.
///
/// `a` is `R × K`, `b` is `K × C`; the result is a fresh `R × C` matrix.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix, OlsError> {
    if a.cols() != b.rows() {
        return Err(OlsError::DimensionMismatch {
            op: "multiply",
            detail: format!(
                "left is {}x{}, right is {}x{} (inner extents {} != {})",
                a.rows(),
                a.cols(),
                b.rows(),
                b.cols(),
                a.cols(),
                b.rows()
            ),
        });
    }

    let (rows, cols) = (a.rows(), b.cols());
    let mut out = Matrix::zeroed(rows, cols);
    for i in 0..rows {
        let a_row = a.row(i);
        let out_row = out.row_mut(i);
        for (k, &a_ik) in a_row.iter().enumerate() {
            for (j, &b_kj) in b.row(k).iter().enumerate() {
                out_row[j] += a_ik * b_kj;
            }
        }
    }
    Ok(out)
}

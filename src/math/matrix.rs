//! Dense row-major matrix.
//!
//! One contiguous buffer plus extents. Extents are fixed at construction and
//! are always at least `1 × 1`.

use std::fmt;
use std::ops::{Index, IndexMut};

use nalgebra::DMatrix;

use crate::error::OlsError;

#[derive(Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// A `rows × cols` matrix of zeros.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, OlsError> {
        check_extents("zeros", rows, cols)?;
        Ok(Self::zeroed(rows, cols))
    }

    /// The `n × n` identity matrix.
    pub fn identity(n: usize) -> Result<Self, OlsError> {
        check_extents("identity", n, n)?;
        let mut m = Self::zeroed(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        Ok(m)
    }

    /// Build from a flat row-major slice.
    pub fn from_row_slice(rows: usize, cols: usize, values: &[f64]) -> Result<Self, OlsError> {
        Self::from_vec(rows, cols, values.to_vec())
    }

    /// Build from a flat row-major buffer, taking ownership.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, OlsError> {
        check_extents("from_vec", rows, cols)?;
        if data.len() != rows * cols {
            return Err(OlsError::DimensionMismatch {
                op: "from_vec",
                detail: format!(
                    "{rows}x{cols} needs {} values, got {}",
                    rows * cols,
                    data.len()
                ),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Build from nested rows. Every row must have the same length.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, OlsError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map(Vec::len).unwrap_or(0);
        check_extents("from_rows", n_rows, n_cols)?;

        let mut data = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(OlsError::DimensionMismatch {
                    op: "from_rows",
                    detail: format!("row {i} has {} values, expected {n_cols}", row.len()),
                });
            }
            data.extend_from_slice(row);
        }
        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            data,
        })
    }

    /// A single-column matrix.
    pub fn column(values: &[f64]) -> Result<Self, OlsError> {
        Self::from_row_slice(values.len(), 1, values)
    }

    /// Zero-filled matrix without extent checks. Callers guarantee `rows, cols >= 1`.
    pub(crate) fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    pub fn row_mut(&mut self, row: usize) -> &mut [f64] {
        let start = row * self.cols;
        &mut self.data[start..start + self.cols]
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Values of column `col`, top to bottom.
    pub fn column_values(&self, col: usize) -> Vec<f64> {
        (0..self.rows).map(|r| self.data[r * self.cols + col]).collect()
    }

    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    pub fn to_dmatrix(&self) -> DMatrix<f64> {
        DMatrix::from_row_slice(self.rows, self.cols, &self.data)
    }

    pub fn from_dmatrix(m: &DMatrix<f64>) -> Result<Self, OlsError> {
        let (rows, cols) = m.shape();
        check_extents("from_dmatrix", rows, cols)?;
        let mut out = Self::zeroed(rows, cols);
        for r in 0..rows {
            for c in 0..cols {
                out[(r, c)] = m[(r, c)];
            }
        }
        Ok(out)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix {}x{} [", self.rows, self.cols)?;
        for r in 0..self.rows {
            writeln!(f, "  {:?}", self.row(r))?;
        }
        write!(f, "]")
    }
}

fn check_extents(op: &'static str, rows: usize, cols: usize) -> Result<(), OlsError> {
    if rows == 0 || cols == 0 {
        return Err(OlsError::DimensionMismatch {
            op,
            detail: format!("extents must be at least 1x1, got {rows}x{cols}"),
        });
    }
    Ok(())
}

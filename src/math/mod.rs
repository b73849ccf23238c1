//! Dense linear algebra: the matrix type, transpose/multiply, Gauss-Jordan
//! inversion, and an SVD least-squares reference solve.

pub mod inverse;
pub mod matrix;
pub mod ols;
pub mod ops;

pub use inverse::*;
pub use matrix::*;
pub use ols::*;
pub use ops::*;

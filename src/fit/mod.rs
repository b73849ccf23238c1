//! Model fitting.
//!
//! Responsibilities:
//!
//! - compose the matrix operations into the normal-equation solve (`fitter`)
//! - apply fitted weights to new rows
//! - report in-sample fit quality (`diagnostics`)

pub mod diagnostics;
pub mod fitter;

pub use diagnostics::*;
pub use fitter::*;

//! `ols-estimate` library crate.
//!
//! The binary (`estimate`) is a thin wrapper around this library so that:
//!
//! - the matrix engine and the fit pipeline are testable without spawning processes
//! - each pipeline step can be exercised in isolation from file I/O

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;

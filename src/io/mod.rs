//! Input/output helpers.
//!
//! - dataset parsing (`ingest`)
//! - dataset writing for synthetic data (`dataset`)
//! - prediction CSV export (`export`)
//! - model JSON read/write (`model`)

pub mod dataset;
pub mod export;
pub mod ingest;
pub mod model;

pub use dataset::*;
pub use export::*;
pub use ingest::*;
pub use model::*;

//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - parsed datasets (`TrainingSet`, `TestSet`)
//! - fit outputs (`FittedModel`, `FitDiagnostics`)
//! - resolved run configuration (`EstimateConfig`, `PredictConfig`, `GenerateConfig`)
//! - JSON file schemas (`ModelFile`, `GeneratedTruth`)

pub mod types;

pub use types::*;

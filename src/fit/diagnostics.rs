//! In-sample fit quality.

use crate::domain::{FitDiagnostics, FittedModel, TrainingSet};
use crate::error::OlsError;
use crate::math::multiply;

/// SSE, RMSE and R² of `model` on its own training rows.
pub fn diagnose(training: &TrainingSet, model: &FittedModel) -> Result<FitDiagnostics, OlsError> {
    let fitted = multiply(&training.x, &model.weights).map_err(|e| e.in_step("diagnostics"))?;
    let y = training.y.as_slice();
    let n = y.len();

    let sse: f64 = y
        .iter()
        .zip(fitted.as_slice())
        .map(|(obs, fit)| (obs - fit).powi(2))
        .sum();
    let mean = y.iter().sum::<f64>() / n as f64;
    let sst: f64 = y.iter().map(|v| (v - mean).powi(2)).sum();

    Ok(FitDiagnostics {
        n_rows: n,
        sse,
        rmse: (sse / n as f64).sqrt(),
        r_squared: (sst > 0.0).then(|| 1.0 - sse / sst),
    })
}

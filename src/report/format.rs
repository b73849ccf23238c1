//! Terminal output: the prediction column and the optional fit summary.
//!
//! Formatting lives here so the numeric code never touches stdout.

use crate::domain::{FitDiagnostics, FittedModel, OutputFormat, TrainingSet};
use crate::math::Matrix;

/// Render predictions one value per line.
///
/// `Rounded` matches `printf("%.0f")`: zero decimal places, ties to even,
/// and a `-0` for small negative values.
pub fn format_predictions(predictions: &Matrix, format: OutputFormat) -> String {
    let mut out = String::new();
    for r in 0..predictions.rows() {
        for &v in predictions.row(r) {
            match format {
                OutputFormat::Rounded => out.push_str(&format!("{v:.0}")),
                OutputFormat::Full => out.push_str(&format!("{v}")),
            }
        }
        out.push('\n');
    }
    out
}

/// Render the fit summary printed by `estimate fit --summary`.
pub fn format_fit_summary(
    training: &TrainingSet,
    model: &FittedModel,
    diagnostics: &FitDiagnostics,
    cross_check: Option<f64>,
) -> String {
    let mut out = String::new();

    out.push_str("=== estimate - OLS normal equations ===\n");
    out.push_str(&format!(
        "Training: '{}' | attributes={} | rows={}\n",
        training.identifier,
        training.num_attributes,
        training.num_rows()
    ));

    out.push_str("\nWeights:\n");
    for (i, w) in model.weight_values().iter().enumerate() {
        let label = if i == 0 { "intercept".to_string() } else { format!("x{i}") };
        out.push_str(&format!("  {label:<10} {w:>16.6}\n"));
    }

    out.push_str("\nFit diagnostics:\n");
    out.push_str(&format!(
        "  SSE={:.6} RMSE={:.6} R²={}\n",
        diagnostics.sse,
        diagnostics.rmse,
        diagnostics
            .r_squared
            .map(|r| format!("{r:.6}"))
            .unwrap_or_else(|| "n/a".to_string())
    ));
    if let Some(diff) = cross_check {
        out.push_str(&format!("  SVD cross-check: max relative difference {diff:.3e}\n"));
    }
    out.push('\n');

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounded_matches_printf_zero_decimals() {
        let p = Matrix::column(&[9.000000001, 12.6, -0.2, 1234.49]).unwrap();
        assert_eq!(format_predictions(&p, OutputFormat::Rounded), "9\n13\n-0\n1234\n");
    }

    #[test]
    fn full_keeps_precision() {
        let p = Matrix::column(&[9.0, 0.125]).unwrap();
        assert_eq!(format_predictions(&p, OutputFormat::Full), "9\n0.125\n");
    }

    #[test]
    fn summary_lists_every_weight() {
        let training = TrainingSet {
            identifier: "train".to_string(),
            num_attributes: 1,
            x: Matrix::from_row_slice(2, 2, &[1.0, 1.0, 1.0, 2.0]).unwrap(),
            y: Matrix::column(&[3.0, 5.0]).unwrap(),
        };
        let model = FittedModel {
            num_attributes: 1,
            weights: Matrix::column(&[1.0, 2.0]).unwrap(),
        };
        let diagnostics = FitDiagnostics {
            n_rows: 2,
            sse: 0.0,
            rmse: 0.0,
            r_squared: Some(1.0),
        };
        let s = format_fit_summary(&training, &model, &diagnostics, Some(1e-15));
        assert!(s.contains("intercept"));
        assert!(s.contains("x1"));
        assert!(s.contains("R²=1.000000"));
        assert!(s.contains("SVD cross-check"));
    }
}

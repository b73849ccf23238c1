//! Export predictions to CSV.
//!
//! One row per test record: the record index, its attribute values, and the
//! predicted value at full precision.

use std::path::Path;

use crate::domain::TestSet;
use crate::error::{AppError, EXIT_INPUT, EXIT_NUMERIC};
use crate::math::Matrix;

/// Write `row,x1..xn,prediction` to a CSV file.
pub fn write_predictions_csv(path: &Path, test: &TestSet, predictions: &Matrix) -> Result<(), AppError> {
    if predictions.shape() != (test.num_rows(), 1) {
        return Err(AppError::new(
            EXIT_NUMERIC,
            format!(
                "Prediction matrix is {}x{}, expected {}x1.",
                predictions.rows(),
                predictions.cols(),
                test.num_rows()
            ),
        ));
    }

    let mut writer = csv::Writer::from_path(path)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to create export CSV '{}': {e}", path.display())))?;

    let mut header = vec!["row".to_string()];
    header.extend((1..=test.num_attributes).map(|i| format!("x{i}")));
    header.push("prediction".to_string());
    writer
        .write_record(&header)
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV header: {e}")))?;

    for r in 0..test.num_rows() {
        let mut record = vec![(r + 1).to_string()];
        record.extend(test.x.row(r)[1..].iter().map(|v| v.to_string()));
        record.push(predictions[(r, 0)].to_string());
        writer
            .write_record(&record)
            .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(EXIT_INPUT, format!("Failed to flush export CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pred.csv");
        let test = TestSet {
            identifier: "data".to_string(),
            num_attributes: 2,
            x: Matrix::from_row_slice(2, 3, &[1.0, 4.0, 5.0, 1.0, 6.5, 7.0]).unwrap(),
        };
        let predictions = Matrix::column(&[9.0, 12.25]).unwrap();

        write_predictions_csv(&path, &test, &predictions).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "row,x1,x2,prediction\n1,4,5,9\n2,6.5,7,12.25\n");
    }

    #[test]
    fn rejects_prediction_shape_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let test = TestSet {
            identifier: "data".to_string(),
            num_attributes: 0,
            x: Matrix::from_row_slice(2, 1, &[1.0, 1.0]).unwrap(),
        };
        let predictions = Matrix::column(&[1.0]).unwrap();
        let err = write_predictions_csv(&dir.path().join("p.csv"), &test, &predictions).unwrap_err();
        assert_eq!(err.exit_code(), EXIT_NUMERIC);
    }
}

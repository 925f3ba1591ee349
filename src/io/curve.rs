//! Read/write precision-recall curve JSON files.
//!
//! The schema is defined by `domain::PrCurveFile`; `msel plot` reads these
//! back to redraw a curve without re-running the search.

use std::fs::File;
use std::path::Path;

use chrono::Utc;

use crate::domain::{Label, PrCurve, PrCurveFile};
use crate::error::AppError;

/// Write a curve JSON file.
pub fn write_curve_json(path: &Path, classifier: &str, positive_label: Label, curve: &PrCurve) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create curve JSON '{}': {e}", path.display())))?;

    let payload = PrCurveFile {
        tool: "msel".to_string(),
        generated_at: Utc::now(),
        classifier: classifier.to_string(),
        positive_label,
        curve: curve.clone(),
    };

    serde_json::to_writer_pretty(file, &payload)
        .map_err(|e| AppError::input(format!("Failed to write curve JSON: {e}")))?;
    Ok(())
}

/// Read a curve JSON file.
pub fn read_curve_json(path: &Path) -> Result<PrCurveFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open curve JSON '{}': {e}", path.display())))?;
    let curve: PrCurveFile =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid curve JSON: {e}")))?;

    let c = &curve.curve;
    if c.precision.is_empty() || c.precision.len() != c.recall.len() {
        return Err(AppError::input("Curve JSON: precision and recall must be non-empty and of equal length."));
    }
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_file_survives_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pr.json");
        let curve = PrCurve {
            precision: vec![0.5, 1.0],
            recall: vec![1.0, 0.0],
            thresholds: vec![0.3],
            average_precision: 0.5,
        };
        write_curve_json(&path, "SVM", 1, &curve).unwrap();

        let back = read_curve_json(&path).unwrap();
        assert_eq!(back.tool, "msel");
        assert_eq!(back.classifier, "SVM");
        assert_eq!(back.positive_label, 1);
        assert_eq!(back.curve, curve);
    }

    #[test]
    fn mismatched_arrays_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(
            &path,
            r#"{"tool":"msel","generated_at":"2024-01-01T00:00:00Z","classifier":"x","positive_label":1,
               "curve":{"precision":[1.0],"recall":[],"thresholds":[],"average_precision":0.0}}"#,
        )
        .unwrap();
        assert_eq!(read_curve_json(&path).unwrap_err().exit_code(), 2);
    }
}

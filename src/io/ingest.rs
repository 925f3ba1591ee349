//! CSV ingest for labelled feature tables.
//!
//! Schema:
//! - a header row is required; header names are matched case-insensitively
//!   (a UTF-8 BOM on the first header is ignored)
//! - the label column holds non-negative integer class ids (`1` or `1.0`)
//! - every other column, or the requested feature subset, must be numeric
//!
//! Bad rows are skipped and reported with their line number; structural
//! problems (missing columns, unreadable file) fail the whole load.

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use csv::StringRecord;

use crate::domain::{Dataset, Label};
use crate::error::AppError;

/// A row-level error encountered during ingest.
#[derive(Debug, Clone)]
pub struct RowError {
    pub line: usize,
    pub message: String,
}

/// Ingest output: the usable rows plus what was skipped.
#[derive(Debug, Clone)]
pub struct IngestedData {
    pub dataset: Dataset,
    pub row_errors: Vec<RowError>,
    pub rows_read: usize,
    pub rows_used: usize,
}

/// Load `path` into a `Dataset`.
///
/// `features` selects and orders the feature columns; `None` means every
/// column except the label, in file order.
pub fn load_dataset(path: &Path, label_column: &str, features: Option<&[String]>) -> Result<IngestedData, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers of '{}': {e}", path.display())))?
        .clone();
    let header_map = build_header_map(&headers);

    let label_idx = *header_map
        .get(&normalize_header_name(label_column))
        .ok_or_else(|| AppError::input(format!("Missing label column `{label_column}` in '{}'.", path.display())))?;

    let feature_columns = resolve_feature_columns(&headers, &header_map, label_idx, features)?;
    let feature_names: Vec<String> = feature_columns
        .iter()
        .map(|&idx| clean_header(&headers[idx]).to_string())
        .collect();

    let mut rows = Vec::new();
    let mut labels = Vec::new();
    let mut row_errors = Vec::new();
    let mut rows_read = 0usize;

    for (idx, result) in reader.records().enumerate() {
        // Header is line 1.
        let line = idx + 2;
        rows_read += 1;

        let record = match result {
            Ok(r) => r,
            Err(e) => {
                row_errors.push(RowError {
                    line,
                    message: format!("CSV parse error: {e}"),
                });
                continue;
            }
        };

        match parse_row(&record, label_idx, &feature_columns, &feature_names) {
            Ok((row, label)) => {
                rows.push(row);
                labels.push(label);
            }
            Err(message) => row_errors.push(RowError { line, message }),
        }
    }

    let rows_used = rows.len();
    if rows_used == 0 {
        return Err(AppError::insufficient(format!(
            "No valid rows in '{}' ({rows_read} read, {} rejected).",
            path.display(),
            row_errors.len()
        )));
    }

    Ok(IngestedData {
        dataset: Dataset::new(feature_names, rows, labels)?,
        row_errors,
        rows_read,
        rows_used,
    })
}

/// Require `other` to carry the same feature columns as `reference`.
pub fn ensure_same_features(reference: &Dataset, other: &Dataset, what: &str) -> Result<(), AppError> {
    if reference.feature_names != other.feature_names {
        return Err(AppError::input(format!(
            "{what} features [{}] do not match training features [{}].",
            other.feature_names.join(", "),
            reference.feature_names.join(", ")
        )));
    }
    Ok(())
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn clean_header(name: &str) -> &str {
    // Spreadsheet exports often prefix the first header with a BOM.
    name.trim().trim_start_matches('\u{feff}')
}

fn normalize_header_name(name: &str) -> String {
    clean_header(name).to_ascii_lowercase()
}

fn resolve_feature_columns(
    headers: &StringRecord,
    header_map: &HashMap<String, usize>,
    label_idx: usize,
    features: Option<&[String]>,
) -> Result<Vec<usize>, AppError> {
    let columns: Vec<usize> = match features {
        Some(names) => names
            .iter()
            .map(|name| {
                let idx = *header_map
                    .get(&normalize_header_name(name))
                    .ok_or_else(|| AppError::input(format!("Missing feature column `{name}`.")))?;
                if idx == label_idx {
                    return Err(AppError::input(format!("Column `{name}` is the label, not a feature.")));
                }
                Ok(idx)
            })
            .collect::<Result<_, _>>()?,
        None => (0..headers.len()).filter(|&idx| idx != label_idx).collect(),
    };

    if columns.is_empty() {
        return Err(AppError::input("The CSV has no feature columns besides the label."));
    }
    Ok(columns)
}

fn parse_row(
    record: &StringRecord,
    label_idx: usize,
    feature_columns: &[usize],
    feature_names: &[String],
) -> Result<(Vec<f64>, Label), String> {
    let raw_label = record
        .get(label_idx)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| "Missing label value.".to_string())?;
    let label = parse_label(raw_label)?;

    let row = feature_columns
        .iter()
        .zip(feature_names)
        .map(|(&idx, name)| {
            let raw = record
                .get(idx)
                .filter(|s| !s.is_empty())
                .ok_or_else(|| format!("Missing value for `{name}`."))?;
            raw.parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| format!("Invalid number `{raw}` for `{name}`."))
        })
        .collect::<Result<Vec<f64>, String>>()?;

    Ok((row, label))
}

fn parse_label(raw: &str) -> Result<Label, String> {
    if let Ok(v) = raw.parse::<Label>() {
        return Ok(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v <= Label::MAX as f64 => Ok(v as Label),
        _ => Err(format!("Invalid label `{raw}` (expected a non-negative integer class id).")),
    }
}

//! Export the selection run to JSON.
//!
//! The export is meant to be easy to consume in notebooks or downstream
//! scripts: one entry per family with its grid scores and dev-set result.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{CandidateScore, CvConfig, FamilyKind, Label, ParamSet};
use crate::error::AppError;
use crate::fit::selection::Selection;

#[derive(Debug, Clone, Serialize)]
pub struct SelectionExport {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    pub scoring: String,
    pub folds: usize,
    pub positive_label: Label,
    pub best_family: String,
    pub families: Vec<FamilyExport>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyExport {
    pub name: String,
    pub kind: FamilyKind,
    pub best_params: ParamSet,
    /// Mean CV score of `best_params`.
    pub cv_score: f64,
    pub dev_weighted_f1: f64,
    pub dev_accuracy: f64,
    /// Failed grid points carry `null` scores.
    pub candidates: Vec<CandidateScore>,
}

impl SelectionExport {
    pub fn from_selection(selection: &Selection, cv: &CvConfig) -> Self {
        let families = selection
            .searches
            .iter()
            .zip(&selection.evaluations)
            .map(|(search, eval)| FamilyExport {
                name: search.name.clone(),
                kind: search.kind,
                best_params: search.best_params.clone(),
                cv_score: search.best_score,
                dev_weighted_f1: eval.weighted_f1,
                dev_accuracy: eval.report.accuracy,
                candidates: search.candidates.clone(),
            })
            .collect();

        Self {
            tool: "msel".to_string(),
            generated_at: Utc::now(),
            scoring: cv.scoring.display_name().to_string(),
            folds: cv.folds,
            positive_label: cv.positive,
            best_family: selection.best().name.clone(),
            families,
        }
    }
}

/// Write the selection report to a JSON file.
pub fn write_selection_json(path: &Path, selection: &Selection, cv: &CvConfig) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, &SelectionExport::from_selection(selection, cv))
        .map_err(|e| AppError::input(format!("Failed to write export JSON: {e}")))?;
    Ok(())
}

//! Model selection across candidate families on a held-out dev set.
//!
//! Two phases:
//! 1. grid-search every family on the training data (`best_config`)
//! 2. evaluate every tuned estimator on the dev set and keep the one with the
//!    highest weighted F1
//!
//! Selection rule: the first evaluation is accepted unconditionally, later ones
//! replace it only with a strictly greater weighted F1. Ties therefore go to
//! the family listed first, and an all-zero run still picks a model.

use std::io::Write;

use tracing::info;

use crate::domain::{CandidateFamily, CvConfig, Dataset, ParamSet};
use crate::error::AppError;
use crate::fit::search::{SearchOutcome, best_config};
use crate::metrics::{ClassificationReport, classification_report, f1_weighted};
use crate::models::Classifier;
use crate::report::format::{fmt_score, format_classification_report};

/// Dev-set evaluation of one tuned family.
#[derive(Debug, Clone)]
pub struct DevEvaluation {
    pub name: String,
    pub params: ParamSet,
    pub report: ClassificationReport,
    pub weighted_f1: f64,
}

/// Output of `best_model`.
pub struct Selection {
    /// Grid-search outcomes in family order.
    pub searches: Vec<SearchOutcome>,
    /// Dev evaluations in family order.
    pub evaluations: Vec<DevEvaluation>,
    pub best_index: usize,
}

impl Selection {
    pub fn best(&self) -> &SearchOutcome {
        &self.searches[self.best_index]
    }

    pub fn best_evaluation(&self) -> &DevEvaluation {
        &self.evaluations[self.best_index]
    }

    pub fn best_estimator(&self) -> &dyn Classifier {
        self.best().estimator.as_ref()
    }
}

/// Tune every family on `train`, then pick the best on `dev` by weighted F1.
pub fn best_model(
    families: &[CandidateFamily],
    train: &Dataset,
    dev: &Dataset,
    cv: &CvConfig,
    out: &mut dyn Write,
) -> Result<Selection, AppError> {
    if families.is_empty() {
        return Err(AppError::input("No candidate families to select from."));
    }
    if dev.is_empty() {
        return Err(AppError::insufficient("The dev set is empty."));
    }

    let mut searches = Vec::with_capacity(families.len());
    for family in families {
        searches.push(best_config(family, train, cv, out)?);
    }

    let mut evaluations = Vec::with_capacity(searches.len());
    let mut best: Option<(usize, f64)> = None;
    for (idx, search) in searches.iter().enumerate() {
        writeln!(out, "\n\nConsidering classifier {}", search.name).map_err(AppError::output)?;

        let y_pred = search.estimator.predict(&dev.rows)?;
        let report = classification_report(&dev.labels, &y_pred)?;
        writeln!(out, "{}", format_classification_report(&report)).map_err(AppError::output)?;

        let weighted_f1 = f1_weighted(&dev.labels, &y_pred);
        writeln!(out, "{}  f1 score:  {}", search.name, fmt_score(weighted_f1)).map_err(AppError::output)?;
        info!(family = %search.name, weighted_f1, "dev evaluation");

        if best.is_none_or(|(_, score)| weighted_f1 > score) {
            best = Some((idx, weighted_f1));
        }
        let best_score = best.map_or(weighted_f1, |(_, score)| score);
        writeln!(out, "Best f1 score: {}", fmt_score(best_score)).map_err(AppError::output)?;

        evaluations.push(DevEvaluation {
            name: search.name.clone(),
            params: search.best_params.clone(),
            report,
            weighted_f1,
        });
    }

    let scores: Vec<f64> = evaluations.iter().map(|e| e.weighted_f1).collect();
    let best_index = select_best(&scores)
        .ok_or_else(|| AppError::insufficient("No classifier could be evaluated on the dev set."))?;
    writeln!(out, "Best classifier: {}", searches[best_index].name).map_err(AppError::output)?;

    Ok(Selection {
        searches,
        evaluations,
        best_index,
    })
}

/// Index of the maximal score; the first maximum wins ties.
pub fn select_best(scores: &[f64]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, &score) in scores.iter().enumerate() {
        if best.is_none_or(|b| score > scores[b]) {
            best = Some(idx);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{FamilyKind, ParamValue, Scoring};
    use crate::fit::candidates::candidate_families;
    use crate::models::testing::separable;

    fn cv() -> CvConfig {
        CvConfig {
            folds: 4,
            shuffle: false,
            scoring: Scoring::Accuracy,
            ..CvConfig::default()
        }
    }

    fn family(name: &str, kind: FamilyKind, key: &str, values: Vec<ParamValue>) -> CandidateFamily {
        CandidateFamily {
            name: name.to_string(),
            kind,
            base: ParamSet::new(),
            grid: vec![BTreeMap::from([(key.to_string(), values)])],
        }
    }

    #[test]
    fn select_best_prefers_first_maximum() {
        assert_eq!(select_best(&[0.5, 0.9, 0.9, 0.1]), Some(1));
        assert_eq!(select_best(&[0.0, 0.0]), Some(0));
        assert_eq!(select_best(&[]), None);
    }

    #[test]
    fn picks_the_family_with_best_dev_f1() {
        let families = vec![
            family("Majority", FamilyKind::Dummy, "strategy", vec!["most_frequent".into()]),
            family("kNN", FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(3)]),
        ];
        let train = separable(10);
        let dev = separable(4);
        let mut out = Vec::new();
        let selection = best_model(&families, &train, &dev, &cv(), &mut out).unwrap();

        assert_eq!(selection.best_index, 1);
        assert_eq!(selection.best().name, "kNN");
        assert!((selection.best_evaluation().weighted_f1 - 1.0).abs() < 1e-12);
        assert_eq!(selection.best_estimator().predict(&[vec![3.0, 2.0]]).unwrap(), vec![1]);

        let text = String::from_utf8(out).unwrap();
        let majority = text.find("Grid search for Majority").unwrap();
        let knn_search = text.find("Grid search for kNN").unwrap();
        let considering = text.find("Considering classifier Majority").unwrap();
        assert!(majority < knn_search && knn_search < considering);
        assert!(text.contains("kNN  f1 score:  1.0\n"));
        assert!(text.ends_with("Best classifier: kNN\n"));
    }

    #[test]
    fn equal_scores_keep_the_first_family() {
        let families = vec![
            family("First", FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(3)]),
            family("Second", FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(5)]),
        ];
        let selection = best_model(&families, &separable(10), &separable(4), &cv(), &mut Vec::new()).unwrap();
        assert_eq!(selection.best().name, "First");
    }

    #[test]
    fn running_best_score_is_printed_after_each_family() {
        let families = vec![
            family("Majority", FamilyKind::Dummy, "strategy", vec!["most_frequent".into()]),
            family("kNN", FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(3)]),
        ];
        let mut out = Vec::new();
        best_model(&families, &separable(10), &separable(4), &cv(), &mut out).unwrap();

        let text = String::from_utf8(out).unwrap();
        let running: Vec<f64> = text
            .lines()
            .filter_map(|line| line.strip_prefix("Best f1 score: "))
            .map(|v| v.parse().unwrap())
            .collect();
        assert_eq!(running.len(), 2);
        assert!((running[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((running[1] - 1.0).abs() < 1e-12);
        assert!(text.contains("Best f1 score: 1.0\n"));
    }

    #[test]
    fn default_candidates_survive_unsupported_grid_points() {
        let families = candidate_families();
        let config = CvConfig {
            folds: 3,
            ..CvConfig::default()
        };
        let selection = best_model(&families, &separable(15), &separable(4), &config, &mut Vec::new()).unwrap();
        assert_eq!(selection.searches.len(), 4);

        let logistic = &selection.searches[1];
        for candidate in &logistic.candidates {
            let is_l1 = candidate.params.get("penalty") == Some(&ParamValue::text("l1"));
            assert_eq!(candidate.mean.is_nan(), is_l1, "{}", candidate.params);
        }

        // Each training fold holds 20 rows, so only n_neighbors = 20 fits.
        let knn = &selection.searches[2];
        assert!(knn.candidates[0].mean.is_finite());
        assert!(knn.candidates[1..].iter().all(|c| c.mean.is_nan()));
        assert_eq!(knn.best_params.to_string(), "{'n_neighbors': 20}");

        assert!((selection.best_evaluation().weighted_f1 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_family_list_is_an_input_error() {
        let err = best_model(&[], &separable(5), &separable(2), &cv(), &mut Vec::new())
            .err()
            .unwrap();
        assert_eq!(err.exit_code(), 2);
    }
}

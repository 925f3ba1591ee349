//! Cross-validated grid search for one candidate family.
//!
//! Every grid point is scored independently (parallel), then the best mean CV
//! score is chosen deterministically: highest mean wins, ties go to the lower
//! grid index. Grid points whose estimator fails are kept in the results with
//! a `NaN` score and can never win.

use std::io::Write;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::domain::{CandidateFamily, CandidateScore, CvConfig, Dataset, FamilyKind, ParamSet};
use crate::error::AppError;
use crate::fit::cv::{check_scoring_target, kfold_splits, mean_std, score_splits};
use crate::fit::grid::expand;
use crate::models::{Classifier, fit_classifier};

/// Result of searching one family.
pub struct SearchOutcome {
    pub name: String,
    pub kind: FamilyKind,
    /// The winning grid point (without the family's base parameters).
    pub best_params: ParamSet,
    /// Base parameters overlaid with `best_params`; what the estimator was fit with.
    pub fitted_params: ParamSet,
    pub best_score: f64,
    /// One entry per grid point, in grid order.
    pub candidates: Vec<CandidateScore>,
    /// Best parameters refit on the full training set.
    pub estimator: Box<dyn Classifier>,
}

/// Search `family`'s grid on `train` and refit the winner.
///
/// Writes `Grid search for <name>` and `Best hyperparameters: <params>` to `out`.
pub fn best_config(
    family: &CandidateFamily,
    train: &Dataset,
    cv: &CvConfig,
    out: &mut dyn Write,
) -> Result<SearchOutcome, AppError> {
    writeln!(out, "\n\nGrid search for {}", family.name).map_err(AppError::output)?;

    let grid_points = expand(&family.grid)?;
    if grid_points.is_empty() {
        return Err(AppError::input(format!("Family '{}' has an empty parameter grid.", family.name)));
    }
    check_scoring_target(train, cv)?;
    let splits = kfold_splits(train, cv)?;
    info!(
        family = %family.name,
        candidates = grid_points.len(),
        folds = splits.len(),
        "grid search"
    );

    let candidates: Vec<CandidateScore> = grid_points
        .par_iter()
        .map(|grid_point| {
            let params = family.base.merged(grid_point);
            match score_splits(family.kind, &params, train, &splits, cv) {
                Ok(fold_scores) => {
                    let (mean, std) = mean_std(&fold_scores);
                    debug!(family = %family.name, params = %grid_point, mean, std, "scored candidate");
                    CandidateScore {
                        params: grid_point.clone(),
                        fold_scores,
                        mean,
                        std,
                    }
                }
                Err(err) => {
                    warn!(family = %family.name, params = %grid_point, "candidate failed: {err}");
                    CandidateScore {
                        params: grid_point.clone(),
                        fold_scores: Vec::new(),
                        mean: f64::NAN,
                        std: f64::NAN,
                    }
                }
            }
        })
        .collect();

    let best_idx = best_candidate(&candidates).ok_or_else(|| {
        AppError::new(
            4,
            format!("Every parameter set failed during grid search for '{}'.", family.name),
        )
    })?;
    let best = &candidates[best_idx];
    let best_params = best.params.clone();
    let best_score = best.mean;
    let fitted_params = family.base.merged(&best_params);

    writeln!(out, "Best hyperparameters: {best_params}").map_err(AppError::output)?;

    let estimator = fit_classifier(family.kind, &fitted_params, train, cv.seed)?;

    Ok(SearchOutcome {
        name: family.name.clone(),
        kind: family.kind,
        best_params,
        fitted_params,
        best_score,
        candidates,
        estimator,
    })
}

/// Index of the highest finite mean score; the first one wins ties.
pub fn best_candidate(candidates: &[CandidateScore]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (idx, c) in candidates.iter().enumerate() {
        if c.mean.is_nan() {
            continue;
        }
        if best.is_none_or(|b| c.mean > candidates[b].mean) {
            best = Some(idx);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{ParamValue, Scoring};
    use crate::models::testing::separable;

    fn family(kind: FamilyKind, key: &str, values: Vec<ParamValue>) -> CandidateFamily {
        CandidateFamily {
            name: "Test family".to_string(),
            kind,
            base: ParamSet::new(),
            grid: vec![BTreeMap::from([(key.to_string(), values)])],
        }
    }

    fn cv() -> CvConfig {
        CvConfig {
            folds: 4,
            shuffle: false,
            scoring: Scoring::Accuracy,
            ..CvConfig::default()
        }
    }

    fn score(mean: f64) -> CandidateScore {
        CandidateScore {
            params: ParamSet::new(),
            fold_scores: vec![mean],
            mean,
            std: 0.0,
        }
    }

    #[test]
    fn ties_go_to_the_first_grid_point() {
        let fam = family(FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(3), ParamValue::Int(5)]);
        let mut out = Vec::new();
        let outcome = best_config(&fam, &separable(10), &cv(), &mut out).unwrap();
        assert_eq!(outcome.best_params.to_string(), "{'n_neighbors': 3}");
        assert_eq!(outcome.candidates.len(), 2);
        assert!((outcome.best_score - 1.0).abs() < 1e-12);

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\n\nGrid search for Test family\n"));
        assert!(text.contains("Best hyperparameters: {'n_neighbors': 3}\n"));
    }

    #[test]
    fn failing_candidates_score_nan_and_lose() {
        let fam = family(FamilyKind::LogisticRegression, "penalty", vec!["l1".into(), "l2".into()]);
        let outcome = best_config(&fam, &separable(10), &cv(), &mut Vec::new()).unwrap();
        assert!(outcome.candidates[0].mean.is_nan());
        assert_eq!(outcome.best_params.to_string(), "{'penalty': 'l2'}");
    }

    #[test]
    fn all_candidates_failing_is_a_model_error() {
        let fam = family(FamilyKind::LogisticRegression, "penalty", vec!["l1".into()]);
        let err = best_config(&fam, &separable(10), &cv(), &mut Vec::new()).err().unwrap();
        assert_eq!(err.exit_code(), 4);
    }

    #[test]
    fn f1_search_without_the_positive_label_is_rejected() {
        let fam = family(FamilyKind::Knn, "n_neighbors", vec![ParamValue::Int(3), ParamValue::Int(5)]);
        let mut train = separable(10);
        for label in &mut train.labels {
            *label *= 2;
        }
        let config = CvConfig {
            scoring: Scoring::F1,
            positive: 1,
            ..cv()
        };
        let err = best_config(&fam, &train, &config, &mut Vec::new()).err().unwrap();
        assert_eq!(err.exit_code(), 2);

        let config = CvConfig { positive: 2, ..config };
        let outcome = best_config(&fam, &train, &config, &mut Vec::new()).unwrap();
        assert!((outcome.best_score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn base_parameters_reach_the_estimator_but_not_best_params() {
        let mut fam = family(FamilyKind::Svm, "C", vec![ParamValue::Int(1)]);
        fam.base = ParamSet::new().with("kernel", "linear");
        let outcome = best_config(&fam, &separable(10), &cv(), &mut Vec::new()).unwrap();
        assert_eq!(outcome.best_params.to_string(), "{'C': 1}");
        assert_eq!(outcome.fitted_params.to_string(), "{'C': 1, 'kernel': 'linear'}");
    }

    #[test]
    fn best_candidate_skips_nan_and_prefers_earlier() {
        let scores = vec![score(f64::NAN), score(0.5), score(0.9), score(0.9)];
        assert_eq!(best_candidate(&scores), Some(2));
        assert_eq!(best_candidate(&[score(f64::NAN)]), None);
    }
}

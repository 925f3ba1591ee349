//! K-fold cross-validated scoring of one parameter set.
//!
//! Fold assignment is delegated to `smartcore`'s `KFold`. Splits are computed
//! once per grid search and shared by every grid point so that candidates are
//! compared on identical folds.

use smartcore::model_selection::{BaseKFold, KFold};
use tracing::trace;

use crate::domain::{CvConfig, Dataset, FamilyKind, ParamSet, Scoring};
use crate::error::AppError;
use crate::metrics::classification::score;
use crate::models::{fit_classifier, to_matrix};

/// Row indices of one fold: `(train, test)`.
pub type Split = (Vec<usize>, Vec<usize>);

/// Partition `train` into `cv.folds` train/test splits.
pub fn kfold_splits(train: &Dataset, cv: &CvConfig) -> Result<Vec<Split>, AppError> {
    if cv.folds < 2 {
        return Err(AppError::input(format!("Cross-validation needs at least 2 folds, got {}.", cv.folds)));
    }
    if cv.folds > train.len() {
        return Err(AppError::input(format!(
            "Cannot split {} training samples into {} folds.",
            train.len(),
            cv.folds
        )));
    }

    let x = to_matrix(&train.rows)?;
    let kfold = KFold::default()
        .with_n_splits(cv.folds)
        .with_shuffle(cv.shuffle)
        .with_seed(Some(cv.seed));
    let splits: Vec<Split> = kfold.split(&x).collect();
    trace!(folds = splits.len(), "computed k-fold splits");
    Ok(splits)
}

/// The binary `f1` scorer needs exactly two training classes, one of them `cv.positive`.
pub fn check_scoring_target(train: &Dataset, cv: &CvConfig) -> Result<(), AppError> {
    if cv.scoring != Scoring::F1 {
        return Ok(());
    }
    let classes = train.classes();
    if classes.len() != 2 {
        return Err(AppError::input(format!(
            "The `f1` scorer needs a binary target, training data has {} classes; use `f1-weighted` or `accuracy`.",
            classes.len()
        )));
    }
    if !classes.contains(&cv.positive) {
        return Err(AppError::input(format!(
            "Positive label {} is not one of the training classes {classes:?}.",
            cv.positive
        )));
    }
    Ok(())
}

/// Fit on each split's train rows and score on its test rows.
pub fn score_splits(
    kind: FamilyKind,
    params: &ParamSet,
    train: &Dataset,
    splits: &[Split],
    cv: &CvConfig,
) -> Result<Vec<f64>, AppError> {
    splits
        .iter()
        .map(|(train_idx, test_idx)| {
            let fold_train = train.subset(train_idx);
            let fold_test = train.subset(test_idx);
            let model = fit_classifier(kind, params, &fold_train, cv.seed)?;
            let predicted = model.predict(&fold_test.rows)?;
            Ok(score(cv.scoring, cv.positive, &fold_test.labels, &predicted))
        })
        .collect()
}

/// Per-fold scores of `params` on `train`.
pub fn cross_val_scores(
    kind: FamilyKind,
    params: &ParamSet,
    train: &Dataset,
    cv: &CvConfig,
) -> Result<Vec<f64>, AppError> {
    let splits = kfold_splits(train, cv)?;
    score_splits(kind, params, train, &splits, cv)
}

/// Mean and population standard deviation; `NaN` for an empty slice.
pub fn mean_std(values: &[f64]) -> (f64, f64) {
    if values.is_empty() {
        return (f64::NAN, f64::NAN);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

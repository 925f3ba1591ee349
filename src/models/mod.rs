//! Classifier adapters.
//!
//! Each family is a thin wrapper that turns a `ParamSet` into the learning
//! library's parameter struct, fits on a `Dataset` and exposes the result as
//! an opaque `Classifier`. The search code stays generic over families.

use smartcore::linalg::basic::matrix::DenseMatrix;

use crate::domain::{Dataset, FamilyKind, Label, ParamSet};
use crate::error::AppError;

pub mod dummy;
pub mod knn;
pub mod logistic;
pub mod params;
pub mod svm;

pub use dummy::DummyClassifier;
pub use knn::KnnClassifier;
pub use logistic::LogisticClassifier;
pub use svm::SvmClassifier;

/// A fitted estimator.
pub trait Classifier {
    /// Hard class predictions, one per row.
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>, AppError>;

    /// Continuous scores where larger means "more likely `positive`".
    ///
    /// Estimators without a margin or probability fall back to a 0/1
    /// indicator of the hard prediction.
    fn decision_scores(&self, rows: &[Vec<f64>], positive: Label) -> Result<Vec<f64>, AppError> {
        Ok(self
            .predict(rows)?
            .into_iter()
            .map(|label| if label == positive { 1.0 } else { 0.0 })
            .collect())
    }
}

/// Fit the estimator of `kind` configured by `params` on `train`.
pub fn fit_classifier(
    kind: FamilyKind,
    params: &ParamSet,
    train: &Dataset,
    seed: u64,
) -> Result<Box<dyn Classifier>, AppError> {
    if train.is_empty() {
        return Err(AppError::insufficient("Cannot fit a classifier on an empty training set."));
    }

    Ok(match kind {
        FamilyKind::Dummy => Box::new(DummyClassifier::fit(params, train, seed)?),
        FamilyKind::LogisticRegression => Box::new(LogisticClassifier::fit(params, train)?),
        FamilyKind::Knn => Box::new(KnnClassifier::fit(params, train)?),
        FamilyKind::Svm => Box::new(SvmClassifier::fit(params, train)?),
    })
}

/// Convert row-major features into the library's dense matrix.
pub(crate) fn to_matrix(rows: &[Vec<f64>]) -> Result<DenseMatrix<f64>, AppError> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(AppError::insufficient("Feature matrix must have at least one row and one column."));
    }
    Ok(DenseMatrix::from_2d_vec(&rows.to_vec()))
}

//! Logistic regression backed by `smartcore`.
//!
//! Parameter mapping:
//! - `C` (inverse regularization strength) becomes `alpha = 1 / C`
//! - `penalty`: the library solves the L2-penalized problem only; `l1` fails the fit
//! - `class_weight`: accepted, but the library has no sample weights, so
//!   `balanced` is logged and ignored

use smartcore::linalg::basic::arrays::Array;
use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::logistic_regression::{LogisticRegression, LogisticRegressionParameters};
use tracing::debug;

use crate::domain::{Dataset, Label, ParamSet};
use crate::error::AppError;
use crate::models::params::ParamReader;
use crate::models::{Classifier, to_matrix};

pub struct LogisticClassifier {
    model: LogisticRegression<f64, Label, DenseMatrix<f64>, Vec<Label>>,
    classes: Vec<Label>,
}

impl LogisticClassifier {
    pub fn fit(params: &ParamSet, train: &Dataset) -> Result<Self, AppError> {
        let reader = ParamReader::new("logistic regression", params, &["C", "penalty", "class_weight"])?;
        let c = reader.f64_or("C", 1.0)?;
        if c <= 0.0 {
            return Err(AppError::input(format!("Logistic regression `C` must be > 0, got {c}.")));
        }
        let penalty = reader.choice_or("penalty", "l2", &["l1", "l2"])?;
        if penalty == "l1" {
            return Err(AppError::new(4, "Logistic regression: penalty 'l1' is not supported by the solver."));
        }
        if reader.choice_or("class_weight", "none", &["none", "balanced"])? == "balanced" {
            debug!("logistic regression: class_weight='balanced' ignored (no sample weights)");
        }

        let x = to_matrix(&train.rows)?;
        let parameters = LogisticRegressionParameters::default().with_alpha(1.0 / c);
        let model = LogisticRegression::fit(&x, &train.labels, parameters)
            .map_err(|e| AppError::model("Logistic regression fit failed", e))?;

        Ok(Self {
            model,
            classes: train.classes(),
        })
    }

    /// `P(class = classes[1] | row)` for a binary model.
    fn upper_class_probability(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        let coef = self.model.coefficients();
        let (r, c) = coef.shape();
        let weight = |j: usize| if r == 1 { *coef.get((0, j)) } else { *coef.get((j, 0)) };
        let n_weights = if r == 1 { c } else { r };
        let intercept = *self.model.intercept().get((0, 0));

        rows.iter()
            .map(|row| {
                let z = intercept + row.iter().take(n_weights).enumerate().map(|(j, v)| weight(j) * v).sum::<f64>();
                1.0 / (1.0 + (-z).exp())
            })
            .collect()
    }
}

impl Classifier for LogisticClassifier {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>, AppError> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| AppError::model("Logistic regression predict failed", e))
    }

    fn decision_scores(&self, rows: &[Vec<f64>], positive: Label) -> Result<Vec<f64>, AppError> {
        match self.classes.as_slice() {
            [_, upper] if *upper == positive => Ok(self.upper_class_probability(rows)),
            [lower, _] if *lower == positive => Ok(self
                .upper_class_probability(rows)
                .into_iter()
                .map(|p| 1.0 - p)
                .collect()),
            _ => Ok(self
                .predict(rows)?
                .into_iter()
                .map(|l| if l == positive { 1.0 } else { 0.0 })
                .collect()),
        }
    }
}

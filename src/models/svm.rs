//! Support vector classifier backed by `smartcore`.
//!
//! The library's fitted `SVC` borrows its training matrix, labels and
//! parameters for its whole lifetime, so this handle owns the training data
//! and fits on demand when predictions or scores are requested. Solver errors
//! therefore surface from `predict` / `decision_scores`.
//!
//! Binary only: the two training classes are mapped to `-1` / `+1` (lower /
//! upper label) and the decision function sign selects the class.

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::svm::Kernels;
use smartcore::svm::svc::{SVC, SVCParameters};

use crate::domain::{Dataset, Label, ParamSet};
use crate::error::AppError;
use crate::models::params::ParamReader;
use crate::models::{Classifier, to_matrix};

#[derive(Debug, Clone, Copy, PartialEq)]
enum KernelSpec {
    Linear,
    Rbf { gamma: f64 },
    Poly { degree: f64, gamma: f64, coef0: f64 },
}

pub struct SvmClassifier {
    x: DenseMatrix<f64>,
    y: Vec<i32>,
    c: f64,
    kernel: KernelSpec,
    lower: Label,
    upper: Label,
}

impl SvmClassifier {
    pub fn fit(params: &ParamSet, train: &Dataset) -> Result<Self, AppError> {
        let reader = ParamReader::new("SVM", params, &["C", "kernel", "degree", "gamma", "coef0"])?;
        let c = reader.f64_or("C", 1.0)?;
        if c <= 0.0 {
            return Err(AppError::input(format!("SVM `C` must be > 0, got {c}.")));
        }

        // Old-style `gamma='auto'`: one over the feature count.
        let gamma = reader.f64_or("gamma", 1.0 / train.n_features().max(1) as f64)?;
        let kernel = match reader.choice_or("kernel", "rbf", &["linear", "rbf", "poly"])? {
            "linear" => KernelSpec::Linear,
            "poly" => KernelSpec::Poly {
                degree: reader.usize_or("degree", 3)? as f64,
                gamma,
                coef0: reader.f64_or("coef0", 0.0)?,
            },
            _ => KernelSpec::Rbf { gamma },
        };

        let [lower, upper] = match train.classes().as_slice() {
            &[lower, upper] => [lower, upper],
            other => {
                return Err(AppError::new(
                    4,
                    format!("SVM supports exactly two classes, training data has {}.", other.len()),
                ));
            }
        };

        Ok(Self {
            x: to_matrix(&train.rows)?,
            y: train.labels.iter().map(|&l| if l == upper { 1 } else { -1 }).collect(),
            c,
            kernel,
            lower,
            upper,
        })
    }

    fn parameters(&self) -> SVCParameters<f64, i32, DenseMatrix<f64>, Vec<i32>> {
        let params = SVCParameters::default().with_c(self.c);
        match self.kernel {
            KernelSpec::Linear => params.with_kernel(Kernels::linear()),
            KernelSpec::Rbf { gamma } => params.with_kernel(Kernels::rbf().with_gamma(gamma)),
            KernelSpec::Poly { degree, gamma, coef0 } => {
                params.with_kernel(Kernels::polynomial().with_params(degree, gamma, coef0))
            }
        }
    }

    /// Signed margin; positive means the upper class.
    fn margins(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, AppError> {
        let x = to_matrix(rows)?;
        let params = self.parameters();
        let svc = SVC::fit(&self.x, &self.y, &params).map_err(|e| AppError::model("SVM fit failed", e))?;
        svc.decision_function(&x)
            .map_err(|e| AppError::model("SVM decision function failed", e))
    }
}

impl Classifier for SvmClassifier {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>, AppError> {
        Ok(self
            .margins(rows)?
            .into_iter()
            .map(|m| if m > 0.0 { self.upper } else { self.lower })
            .collect())
    }

    fn decision_scores(&self, rows: &[Vec<f64>], positive: Label) -> Result<Vec<f64>, AppError> {
        let margins = self.margins(rows)?;
        Ok(if positive == self.upper {
            margins
        } else if positive == self.lower {
            margins.into_iter().map(|m| -m).collect()
        } else {
            vec![0.0; margins.len()]
        })
    }
}

//! k-nearest-neighbours classifier backed by `smartcore` (Euclidean distance,
//! uniform vote).

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::metrics::distance::euclidian::Euclidian;
use smartcore::neighbors::knn_classifier::{KNNClassifier, KNNClassifierParameters};

use crate::domain::{Dataset, Label, ParamSet};
use crate::error::AppError;
use crate::models::params::ParamReader;
use crate::models::{Classifier, to_matrix};

pub struct KnnClassifier {
    model: KNNClassifier<f64, Label, DenseMatrix<f64>, Vec<Label>, Euclidian<f64>>,
}

impl KnnClassifier {
    pub fn fit(params: &ParamSet, train: &Dataset) -> Result<Self, AppError> {
        let reader = ParamReader::new("kNN", params, &["n_neighbors"])?;
        let k = reader.usize_or("n_neighbors", 5)?;
        if k < 2 || k > train.len() {
            return Err(AppError::new(
                4,
                format!("kNN: n_neighbors={k} must be in 2..={} (training samples).", train.len()),
            ));
        }

        let x = to_matrix(&train.rows)?;
        let model = KNNClassifier::fit(&x, &train.labels, KNNClassifierParameters::default().with_k(k))
            .map_err(|e| AppError::model("kNN fit failed", e))?;
        Ok(Self { model })
    }
}

impl Classifier for KnnClassifier {
    fn predict(&self, rows: &[Vec<f64>]) -> Result<Vec<Label>, AppError> {
        let x = to_matrix(rows)?;
        self.model
            .predict(&x)
            .map_err(|e| AppError::model("kNN predict failed", e))
    }
}

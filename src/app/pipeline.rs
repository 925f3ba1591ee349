//! Shared "selection pipeline" used by `msel select` and `msel demo`.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load data -> train/dev split -> candidate families -> grid searches ->
//! dev selection -> precision-recall curve
//!
//! The front-end in `app` then only handles presentation and exports.

use std::io::Write;
use std::path::Path;

use tracing::{info, warn};

use crate::data::{generate_synthetic, train_dev_split};
use crate::domain::{CandidateFamily, DataSource, Dataset, PrCurve, SelectConfig};
use crate::error::AppError;
use crate::fit::candidates::candidate_families;
use crate::fit::selection::{Selection, best_model};
use crate::io::families::read_families_json;
use crate::io::ingest::{IngestedData, ensure_same_features, load_dataset};
use crate::metrics::precision_recall_curve;
use crate::report::format::format_dataset_summary;

/// All computed outputs of a single run.
pub struct RunOutput {
    pub train: Dataset,
    pub dev: Dataset,
    pub families: Vec<CandidateFamily>,
    pub selection: Selection,
    /// Present when a plot or curve export was requested.
    pub pr_curve: Option<PrCurve>,
}

/// Execute the full selection pipeline, streaming console output to `out`.
pub fn run_selection(config: &SelectConfig, out: &mut dyn Write) -> Result<RunOutput, AppError> {
    let (train, dev) = load_data(&config.source, config.seed)?;
    writeln!(out, "{}", format_dataset_summary(&train, &dev)).map_err(AppError::output)?;

    let families = load_families(config.families_path.as_deref())?;
    let selection = best_model(&families, &train, &dev, &config.cv, out)?;

    let wants_curve = config.plot_pr || config.pr_svg.is_some() || config.export_pr.is_some();
    let pr_curve = if wants_curve {
        let scores = selection
            .best_estimator()
            .decision_scores(&dev.rows, config.cv.positive)?;
        Some(precision_recall_curve(&dev.labels, &scores, config.cv.positive)?)
    } else {
        None
    };

    Ok(RunOutput {
        train,
        dev,
        families,
        selection,
        pr_curve,
    })
}

/// Load (or generate) the train and dev sets.
pub fn load_data(source: &DataSource, seed: u64) -> Result<(Dataset, Dataset), AppError> {
    match source {
        DataSource::Csv {
            train,
            dev,
            dev_fraction,
            label_column,
            features,
        } => {
            let train_data = load_logged(train, label_column, features.as_deref())?;
            match dev {
                Some(dev_path) => {
                    let dev_data = load_logged(dev_path, label_column, features.as_deref())?;
                    ensure_same_features(&train_data, &dev_data, "Dev")?;
                    Ok((train_data, dev_data))
                }
                None => train_dev_split(&train_data, *dev_fraction, seed),
            }
        }
        DataSource::Synthetic(synthetic) => {
            let data = generate_synthetic(synthetic, seed)?;
            info!(samples = data.len(), features = data.n_features(), "generated synthetic data");
            train_dev_split(&data, synthetic.dev_fraction, seed)
        }
    }
}

/// The candidate list: a families file if given, else the defaults.
pub fn load_families(path: Option<&Path>) -> Result<Vec<CandidateFamily>, AppError> {
    match path {
        Some(path) => {
            let families = read_families_json(path)?;
            info!(count = families.len(), path = %path.display(), "loaded candidate families");
            Ok(families)
        }
        None => Ok(candidate_families()),
    }
}

fn load_logged(path: &Path, label_column: &str, features: Option<&[String]>) -> Result<Dataset, AppError> {
    let IngestedData {
        dataset,
        row_errors,
        rows_read,
        rows_used,
    } = load_dataset(path, label_column, features)?;

    for err in &row_errors {
        warn!(file = %path.display(), line = err.line, "skipped row: {}", err.message);
    }
    info!(file = %path.display(), rows_read, rows_used, "loaded CSV");
    Ok(dataset)
}

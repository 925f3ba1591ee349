//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed between ingest, search and selection in-memory
//! - exported to JSON
//! - reloaded later (candidate family files, precision-recall curves)

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Class id of a sample.
pub type Label = u32;

/// A labelled feature matrix held row-major.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub feature_names: Vec<String>,
    pub rows: Vec<Vec<f64>>,
    pub labels: Vec<Label>,
}

impl Dataset {
    /// Build a dataset, checking that every row matches the feature count and
    /// that there is exactly one label per row.
    pub fn new(feature_names: Vec<String>, rows: Vec<Vec<f64>>, labels: Vec<Label>) -> Result<Self, AppError> {
        if rows.len() != labels.len() {
            return Err(AppError::input(format!(
                "Row/label count mismatch: {} rows vs {} labels.",
                rows.len(),
                labels.len()
            )));
        }
        if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != feature_names.len()) {
            return Err(AppError::input(format!(
                "Row {idx} has {} values, expected {} features.",
                row.len(),
                feature_names.len()
            )));
        }
        Ok(Self {
            feature_names,
            rows,
            labels,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn n_features(&self) -> usize {
        self.feature_names.len()
    }

    /// Distinct labels in ascending order.
    pub fn classes(&self) -> Vec<Label> {
        self.labels.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
    }

    /// Sample count per label.
    pub fn class_counts(&self) -> BTreeMap<Label, usize> {
        let mut counts = BTreeMap::new();
        for &label in &self.labels {
            *counts.entry(label).or_insert(0) += 1;
        }
        counts
    }

    /// Copy out the rows at `indices` (in that order).
    pub fn subset(&self, indices: &[usize]) -> Dataset {
        Dataset {
            feature_names: self.feature_names.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// A single hyperparameter value.
///
/// Untagged so that family files can be written naturally:
/// `{"C": [0.1, 1, 10], "kernel": ["rbf", "linear"]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl ParamValue {
    pub fn text(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ParamValue::Int(v) => Some(*v as f64),
            ParamValue::Float(v) => Some(*v),
            ParamValue::Text(_) => None,
        }
    }

    /// Integral, non-negative values only (`3` or `3.0`).
    pub fn as_usize(&self) -> Option<usize> {
        match self {
            ParamValue::Int(v) => usize::try_from(*v).ok(),
            ParamValue::Float(v) if v.is_finite() && *v >= 0.0 && v.fract() == 0.0 => Some(*v as usize),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.1}"),
            ParamValue::Float(v) => write!(f, "{v}"),
            ParamValue::Text(s) => write!(f, "'{s}'"),
        }
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Int(value)
    }
}

impl From<f64> for ParamValue {
    fn from(value: f64) -> Self {
        ParamValue::Float(value)
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::text(value)
    }
}

/// One concrete hyperparameter assignment, keyed by name (sorted).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParamSet(pub BTreeMap<String, ParamValue>);

impl ParamSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: &str, value: impl Into<ParamValue>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ParamValue) {
        self.0.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// `self` overlaid with `overrides` (overrides win).
    pub fn merged(&self, overrides: &ParamSet) -> ParamSet {
        let mut out = self.clone();
        for (k, v) in &overrides.0 {
            out.0.insert(k.clone(), v.clone());
        }
        out
    }
}

impl fmt::Display for ParamSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (k, v)) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "'{k}': {v}")?;
        }
        write!(f, "}}")
    }
}

/// A search space: a list of sub-grids, each mapping a parameter name to the
/// values to try.
pub type ParamGrid = Vec<BTreeMap<String, Vec<ParamValue>>>;

/// Estimator family backing a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FamilyKind {
    Dummy,
    LogisticRegression,
    Knn,
    Svm,
}

impl FamilyKind {
    pub fn display_name(self) -> &'static str {
        match self {
            FamilyKind::Dummy => "dummy",
            FamilyKind::LogisticRegression => "logistic-regression",
            FamilyKind::Knn => "knn",
            FamilyKind::Svm => "svm",
        }
    }
}

/// A named estimator family plus the grid to search over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateFamily {
    pub name: String,
    pub kind: FamilyKind,
    /// Fixed parameters applied under every grid point.
    #[serde(default)]
    pub base: ParamSet,
    pub grid: ParamGrid,
}

/// Score used to rank grid points during cross-validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Scoring {
    /// Binary F1 of the positive label.
    F1,
    /// Support-weighted mean of per-class F1.
    F1Weighted,
    Accuracy,
}

impl Scoring {
    pub fn display_name(self) -> &'static str {
        match self {
            Scoring::F1 => "f1",
            Scoring::F1Weighted => "f1_weighted",
            Scoring::Accuracy => "accuracy",
        }
    }
}

/// Cross-validation settings shared by every grid search in a run.
#[derive(Debug, Clone)]
pub struct CvConfig {
    pub folds: usize,
    pub shuffle: bool,
    pub scoring: Scoring,
    /// Label treated as positive by `Scoring::F1` and the precision-recall curve.
    pub positive: Label,
    /// Seed for estimators that draw random numbers.
    pub seed: u64,
}

impl Default for CvConfig {
    fn default() -> Self {
        Self {
            folds: 10,
            shuffle: true,
            scoring: Scoring::F1,
            positive: 1,
            seed: 42,
        }
    }
}

/// Mean/std of the fold scores for one grid point.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateScore {
    pub params: ParamSet,
    pub fold_scores: Vec<f64>,
    /// `NaN` when the estimator failed on at least one fold.
    pub mean: f64,
    pub std: f64,
}

/// Where the train/dev data comes from.
#[derive(Debug, Clone)]
pub enum DataSource {
    Csv {
        train: PathBuf,
        dev: Option<PathBuf>,
        /// Used when `dev` is absent: hold out this fraction of `train`.
        dev_fraction: f64,
        label_column: String,
        features: Option<Vec<String>>,
    },
    Synthetic(SyntheticConfig),
}

/// Parameters of the built-in two-class synthetic dataset.
#[derive(Debug, Clone)]
pub struct SyntheticConfig {
    pub samples: usize,
    pub features: usize,
    /// Fraction of samples drawn from the positive class.
    pub positive_rate: f64,
    /// Distance between class means along every feature axis.
    pub separation: f64,
    pub dev_fraction: f64,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct SelectConfig {
    pub source: DataSource,
    pub families_path: Option<PathBuf>,
    pub cv: CvConfig,
    pub seed: u64,
    pub show_grid_scores: bool,

    pub plot_pr: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub pr_svg: Option<PathBuf>,

    pub export: Option<PathBuf>,
    pub export_pr: Option<PathBuf>,
}

/// Precision-recall pairs ordered by decreasing recall, ending at `(1, 0)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
    /// Increasing score thresholds; one fewer than the curve points.
    pub thresholds: Vec<f64>,
    pub average_precision: f64,
}

/// A saved precision-recall curve file (JSON).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrCurveFile {
    pub tool: String,
    pub generated_at: DateTime<Utc>,
    /// Name of the classifier the scores came from.
    pub classifier: String,
    pub positive_label: Label,
    pub curve: PrCurve,
}

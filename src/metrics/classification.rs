//! Classification metrics computed from label vectors.
//!
//! Conventions:
//! - the label set is the union of labels seen in `y_true` and `y_pred`
//! - a ratio with a zero denominator is `0.0`
//! - "weighted" averages weight each label by its support (count in `y_true`)

use std::collections::BTreeSet;

use crate::domain::{Label, Scoring};
use crate::error::AppError;

/// Per-label precision / recall / F1.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassMetrics {
    pub label: Label,
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

/// An averaged row of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct Averages {
    pub precision: f64,
    pub recall: f64,
    pub f1: f64,
    pub support: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationReport {
    pub classes: Vec<ClassMetrics>,
    pub accuracy: f64,
    pub macro_avg: Averages,
    pub weighted_avg: Averages,
}

/// Per-label counts for one-vs-rest scoring of `label`.
#[derive(Debug, Clone, Copy, Default)]
struct Counts {
    tp: usize,
    fp: usize,
    fn_: usize,
}

fn counts(y_true: &[Label], y_pred: &[Label], label: Label) -> Counts {
    let mut c = Counts::default();
    for (&t, &p) in y_true.iter().zip(y_pred) {
        match (t == label, p == label) {
            (true, true) => c.tp += 1,
            (false, true) => c.fp += 1,
            (true, false) => c.fn_ += 1,
            (false, false) => {}
        }
    }
    c
}

fn ratio(num: usize, den: usize) -> f64 {
    if den == 0 { 0.0 } else { num as f64 / den as f64 }
}

fn f1_from(precision: f64, recall: f64) -> f64 {
    if precision + recall == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / (precision + recall)
    }
}

fn check_lengths(y_true: &[Label], y_pred: &[Label]) -> Result<(), AppError> {
    if y_true.len() != y_pred.len() {
        return Err(AppError::input(format!(
            "Label vectors differ in length: {} true vs {} predicted.",
            y_true.len(),
            y_pred.len()
        )));
    }
    Ok(())
}

fn class_metrics(y_true: &[Label], y_pred: &[Label], label: Label) -> ClassMetrics {
    let c = counts(y_true, y_pred, label);
    let precision = ratio(c.tp, c.tp + c.fp);
    let recall = ratio(c.tp, c.tp + c.fn_);
    ClassMetrics {
        label,
        precision,
        recall,
        f1: f1_from(precision, recall),
        support: c.tp + c.fn_,
    }
}

fn labels_of(y_true: &[Label], y_pred: &[Label]) -> Vec<Label> {
    y_true.iter().chain(y_pred).copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Fraction of exact matches; `0.0` for empty input.
pub fn accuracy(y_true: &[Label], y_pred: &[Label]) -> f64 {
    if y_true.is_empty() || y_true.len() != y_pred.len() {
        return 0.0;
    }
    smartcore::metrics::accuracy(&y_true.to_vec(), &y_pred.to_vec())
}

/// Binary F1 treating `positive` as the positive class.
pub fn f1_binary(y_true: &[Label], y_pred: &[Label], positive: Label) -> f64 {
    class_metrics(y_true, y_pred, positive).f1
}

/// Support-weighted mean of per-label F1.
pub fn f1_weighted(y_true: &[Label], y_pred: &[Label]) -> f64 {
    let mut total = 0usize;
    let mut acc = 0.0;
    for label in labels_of(y_true, y_pred) {
        let m = class_metrics(y_true, y_pred, label);
        acc += m.f1 * m.support as f64;
        total += m.support;
    }
    if total == 0 { 0.0 } else { acc / total as f64 }
}

/// Score predictions with the configured cross-validation scorer.
pub fn score(scoring: Scoring, positive: Label, y_true: &[Label], y_pred: &[Label]) -> f64 {
    match scoring {
        Scoring::F1 => f1_binary(y_true, y_pred, positive),
        Scoring::F1Weighted => f1_weighted(y_true, y_pred),
        Scoring::Accuracy => accuracy(y_true, y_pred),
    }
}

/// Build the full per-label report.
pub fn classification_report(y_true: &[Label], y_pred: &[Label]) -> Result<ClassificationReport, AppError> {
    check_lengths(y_true, y_pred)?;
    if y_true.is_empty() {
        return Err(AppError::insufficient("Cannot build a classification report from zero samples."));
    }

    let classes: Vec<ClassMetrics> = labels_of(y_true, y_pred)
        .into_iter()
        .map(|label| class_metrics(y_true, y_pred, label))
        .collect();

    let n_classes = classes.len() as f64;
    let support: usize = classes.iter().map(|c| c.support).sum();
    let macro_avg = Averages {
        precision: classes.iter().map(|c| c.precision).sum::<f64>() / n_classes,
        recall: classes.iter().map(|c| c.recall).sum::<f64>() / n_classes,
        f1: classes.iter().map(|c| c.f1).sum::<f64>() / n_classes,
        support,
    };
    let weighted = |value: fn(&ClassMetrics) -> f64| {
        if support == 0 {
            0.0
        } else {
            classes.iter().map(|c| value(c) * c.support as f64).sum::<f64>() / support as f64
        }
    };
    let weighted_avg = Averages {
        precision: weighted(|c| c.precision),
        recall: weighted(|c| c.recall),
        f1: weighted(|c| c.f1),
        support,
    };

    Ok(ClassificationReport {
        accuracy: accuracy(y_true, y_pred),
        classes,
        macro_avg,
        weighted_avg,
    })
}

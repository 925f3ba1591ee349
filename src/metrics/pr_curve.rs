//! Precision-recall curve for a binary scorer.
//!
//! Thresholds are the distinct score values. For each threshold `s` the
//! classifier "predicts positive" for every score `>= s`; precision and recall
//! follow from the cumulative true/false positive counts in descending score
//! order. The curve stops at the first threshold that reaches full recall and
//! is returned in decreasing-recall order with a closing `(precision 1,
//! recall 0)` point that has no threshold.

use crate::domain::{Label, PrCurve};
use crate::error::AppError;

pub fn precision_recall_curve(y_true: &[Label], scores: &[f64], positive: Label) -> Result<PrCurve, AppError> {
    if y_true.len() != scores.len() {
        return Err(AppError::input(format!(
            "Label/score length mismatch: {} labels vs {} scores.",
            y_true.len(),
            scores.len()
        )));
    }
    if scores.iter().any(|s| !s.is_finite()) {
        return Err(AppError::new(4, "Precision-recall curve: non-finite score."));
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));

    // Cumulative counts at the last position of each distinct score.
    let mut tps: Vec<usize> = Vec::new();
    let mut fps: Vec<usize> = Vec::new();
    let mut thresholds: Vec<f64> = Vec::new();
    let (mut tp, mut fp) = (0usize, 0usize);
    for (pos, &i) in order.iter().enumerate() {
        if y_true[i] == positive {
            tp += 1;
        } else {
            fp += 1;
        }
        let is_last_of_value = order.get(pos + 1).is_none_or(|&next| scores[next] != scores[i]);
        if is_last_of_value {
            tps.push(tp);
            fps.push(fp);
            thresholds.push(scores[i]);
        }
    }

    let total_pos = tps.last().copied().unwrap_or(0);
    if total_pos == 0 {
        return Err(AppError::insufficient(format!(
            "Precision-recall curve needs at least one sample of the positive label {positive}."
        )));
    }

    let last = tps.iter().position(|&t| t == total_pos).unwrap_or(tps.len() - 1);

    let mut precision = Vec::with_capacity(last + 2);
    let mut recall = Vec::with_capacity(last + 2);
    let mut kept_thresholds = Vec::with_capacity(last + 1);
    for k in (0..=last).rev() {
        precision.push(tps[k] as f64 / (tps[k] + fps[k]) as f64);
        recall.push(tps[k] as f64 / total_pos as f64);
        kept_thresholds.push(thresholds[k]);
    }
    precision.push(1.0);
    recall.push(0.0);

    let average_precision = average_precision(&precision, &recall);

    Ok(PrCurve {
        precision,
        recall,
        thresholds: kept_thresholds,
        average_precision,
    })
}

/// Step-wise area: `Σ (Rₙ − Rₙ₊₁) · Pₙ` over a decreasing-recall curve.
pub fn average_precision(precision: &[f64], recall: &[f64]) -> f64 {
    recall
        .windows(2)
        .zip(precision)
        .map(|(r, p)| (r[0] - r[1]) * p)
        .sum()
}

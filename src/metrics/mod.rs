//! Scoring of predictions against true labels.

pub mod classification;
pub mod pr_curve;

pub use classification::{ClassificationReport, classification_report, f1_weighted};
pub use pr_curve::precision_recall_curve;

//! Formatted terminal output.
//!
//! Formatting lives here so the search/selection code only decides *what* to
//! print and output changes stay localized.

use crate::domain::{CandidateFamily, Dataset};
use crate::fit::grid::grid_size;
use crate::fit::search::SearchOutcome;
use crate::fit::selection::Selection;
use crate::metrics::ClassificationReport;

const REPORT_DIGITS: usize = 2;

/// Shortest round-trip float text, keeping a `.0` on integral values.
pub fn fmt_score(v: f64) -> String {
    if v.is_nan() {
        "nan".to_string()
    } else if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        format!("{v}")
    }
}

/// Per-label precision/recall/F1/support table followed by the accuracy,
/// macro average and weighted average rows.
pub fn format_classification_report(report: &ClassificationReport) -> String {
    let names: Vec<String> = report.classes.iter().map(|c| c.label.to_string()).collect();
    let width = names.iter().map(String::len).max().unwrap_or(0).max("weighted avg".len());
    let d = REPORT_DIGITS;

    let mut out = format!("{:>width$} ", "");
    for header in ["precision", "recall", "f1-score", "support"] {
        out.push_str(&format!(" {header:>9}"));
    }
    out.push_str("\n\n");

    let row = |name: &str, p: f64, r: f64, f: f64, support: usize| {
        format!("{name:>width$}  {p:>9.d$} {r:>9.d$} {f:>9.d$} {support:>9}\n")
    };

    for (name, c) in names.iter().zip(&report.classes) {
        out.push_str(&row(name, c.precision, c.recall, c.f1, c.support));
    }
    out.push('\n');

    out.push_str(&format!(
        "{:>width$}  {:>9} {:>9} {:>9.d$} {:>9}\n",
        "accuracy", "", "", report.accuracy, report.weighted_avg.support
    ));
    let m = &report.macro_avg;
    out.push_str(&row("macro avg", m.precision, m.recall, m.f1, m.support));
    let w = &report.weighted_avg;
    out.push_str(&row("weighted avg", w.precision, w.recall, w.f1, w.support));

    out
}

/// Mean ± 2·std of every grid point, best one starred.
pub fn format_grid_scores(outcome: &SearchOutcome) -> String {
    let mut out = format!("Grid scores for {}:\n", outcome.name);
    for c in &outcome.candidates {
        let chosen = if c.params == outcome.best_params { "*" } else { " " };
        if c.mean.is_nan() {
            out.push_str(&format!("{chosen} {:>8} (failed) for {}\n", "nan", c.params));
        } else {
            out.push_str(&format!(
                "{chosen} {:>8.4} (+/-{:.4}) for {}\n",
                c.mean,
                2.0 * c.std,
                c.params
            ));
        }
    }
    out
}

/// One line per family: CV score, dev weighted F1 and tuned parameters.
pub fn format_selection_summary(selection: &Selection) -> String {
    let mut out = String::new();
    out.push_str(
        format!("  {:<32} {:>10} {:>10}  {}", "family", "cv score", "dev f1", "best params")
            .trim_end(),
    );
    out.push('\n');
    out.push_str(format!("  {:-<32} {:-<10} {:-<10}  {:-<11}", "", "", "", "").trim_end());
    out.push('\n');

    for (idx, (search, eval)) in selection.searches.iter().zip(&selection.evaluations).enumerate() {
        let chosen = if idx == selection.best_index { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} {:<32} {:>10.4} {:>10.4}  {}\n",
            truncate(&search.name, 32),
            search.best_score,
            eval.weighted_f1,
            search.best_params
        ));
    }
    out
}

/// The candidate list with kinds, fixed parameters and grids.
pub fn format_candidates(families: &[CandidateFamily]) -> String {
    let mut out = String::new();
    for family in families {
        out.push_str(&format!(
            "{} ({}, {} parameter sets)\n",
            family.name,
            family.kind.display_name(),
            grid_size(&family.grid)
        ));
        if !family.base.is_empty() {
            out.push_str(&format!("  base: {}\n", family.base));
        }
        for sub in &family.grid {
            let entries: Vec<String> = sub
                .iter()
                .map(|(key, values)| {
                    let shown: Vec<String> = values.iter().map(ToString::to_string).collect();
                    format!("'{key}': [{}]", shown.join(", "))
                })
                .collect();
            out.push_str(&format!("  grid: {{{}}}\n", entries.join(", ")));
        }
    }
    out
}

/// Sample and class counts for the train/dev split.
pub fn format_dataset_summary(train: &Dataset, dev: &Dataset) -> String {
    let mut out = String::new();
    out.push_str(&format!("Features: {} ({})\n", train.n_features(), train.feature_names.join(", ")));
    for (name, data) in [("Train", train), ("Dev", dev)] {
        let counts: Vec<String> = data
            .class_counts()
            .iter()
            .map(|(label, n)| format!("{label}={n}"))
            .collect();
        out.push_str(&format!("{name}: n={} | classes: {}\n", data.len(), counts.join(" ")));
    }
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::{FamilyKind, ParamSet, ParamValue};
    use crate::metrics::classification_report;

    #[test]
    fn scores_print_like_python_floats() {
        assert_eq!(fmt_score(1.0), "1.0");
        assert_eq!(fmt_score(0.0), "0.0");
        assert_eq!(fmt_score(2.0 / 3.0), "0.6666666666666666");
        assert_eq!(fmt_score(f64::NAN), "nan");
    }

    #[test]
    fn classification_report_layout() {
        let y_true = [0, 0, 0, 0, 0, 0, 1, 1, 1, 1];
        let y_pred = [0, 0, 0, 0, 1, 1, 1, 1, 1, 0];
        let report = classification_report(&y_true, &y_pred).unwrap();
        let text = format_classification_report(&report);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "              precision    recall  f1-score   support");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "           0       0.80      0.67      0.73         6");
        assert_eq!(lines[3], "           1       0.60      0.75      0.67         4");
        assert_eq!(lines[4], "");
        assert_eq!(lines[5], "    accuracy                           0.70        10");
        assert_eq!(lines[6], "   macro avg       0.70      0.71      0.70        10");
        assert!(lines[7].starts_with("weighted avg       0.72      0.70"));
    }

    #[test]
    fn candidates_listing_shows_grid_and_base() {
        let families = vec![CandidateFamily {
            name: "SVM".to_string(),
            kind: FamilyKind::Svm,
            base: ParamSet::new().with("C", 1i64),
            grid: vec![BTreeMap::from([(
                "kernel".to_string(),
                vec![ParamValue::text("linear"), ParamValue::text("rbf")],
            )])],
        }];
        let text = format_candidates(&families);
        assert_eq!(
            text,
            "SVM (svm, 2 parameter sets)\n  base: {'C': 1}\n  grid: {'kernel': ['linear', 'rbf']}\n"
        );
    }

    #[test]
    fn truncate_marks_cut_names() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }
}

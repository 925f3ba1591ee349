//! The default candidate families.

use std::collections::BTreeMap;

use crate::domain::{CandidateFamily, FamilyKind, ParamSet, ParamValue};

fn floats(values: &[f64]) -> Vec<ParamValue> {
    values.iter().copied().map(ParamValue::Float).collect()
}

fn ints(values: impl IntoIterator<Item = i64>) -> Vec<ParamValue> {
    values.into_iter().map(ParamValue::Int).collect()
}

fn texts(values: &[&str]) -> Vec<ParamValue> {
    values.iter().map(|v| ParamValue::text(v)).collect()
}

fn sub_grid(entries: Vec<(&str, Vec<ParamValue>)>) -> BTreeMap<String, Vec<ParamValue>> {
    entries.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

/// Majority baseline, logistic regression, kNN and SVM, in that order.
pub fn candidate_families() -> Vec<CandidateFamily> {
    let mut lr_c = floats(&[0.001, 0.01, 0.1]);
    lr_c.extend(ints([1, 10, 100, 1000]));

    let mut svm_c = floats(&[0.01]);
    svm_c.extend(ints([1, 100]));

    vec![
        CandidateFamily {
            name: "Majority Classifier".to_string(),
            kind: FamilyKind::Dummy,
            base: ParamSet::new(),
            grid: vec![sub_grid(vec![("strategy", texts(&["stratified", "most_frequent"]))])],
        },
        CandidateFamily {
            name: "Logistic Regression Classifier".to_string(),
            kind: FamilyKind::LogisticRegression,
            base: ParamSet::new().with("class_weight", "balanced"),
            grid: vec![sub_grid(vec![("C", lr_c), ("penalty", texts(&["l1", "l2"]))])],
        },
        CandidateFamily {
            name: "kNN".to_string(),
            kind: FamilyKind::Knn,
            base: ParamSet::new(),
            grid: vec![sub_grid(vec![("n_neighbors", ints(20..30))])],
        },
        CandidateFamily {
            name: "SVM".to_string(),
            kind: FamilyKind::Svm,
            base: ParamSet::new().with("C", 1i64),
            grid: vec![sub_grid(vec![
                ("C", svm_c),
                ("kernel", texts(&["poly", "linear", "rbf"])),
                ("degree", ints(1..=3)),
            ])],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fit::grid::{expand, grid_size};

    #[test]
    fn default_grid_sizes() {
        let sizes: Vec<usize> = candidate_families().iter().map(|f| grid_size(&f.grid)).collect();
        assert_eq!(sizes, vec![2, 14, 10, 27]);
    }

    #[test]
    fn logistic_grid_starts_with_smallest_c() {
        let families = candidate_families();
        let points = expand(&families[1].grid).unwrap();
        assert_eq!(points[0].to_string(), "{'C': 0.001, 'penalty': 'l1'}");
        assert_eq!(points[7].to_string(), "{'C': 1, 'penalty': 'l2'}");
        assert_eq!(families[1].base.to_string(), "{'class_weight': 'balanced'}");
    }

    #[test]
    fn knn_neighbours_run_from_twenty_to_twenty_nine() {
        let families = candidate_families();
        let points = expand(&families[2].grid).unwrap();
        assert_eq!(points.first().unwrap().to_string(), "{'n_neighbors': 20}");
        assert_eq!(points.last().unwrap().to_string(), "{'n_neighbors': 29}");
    }
}

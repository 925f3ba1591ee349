//! Parameter grid expansion.
//!
//! A grid is a list of sub-grids. Each sub-grid expands to the Cartesian
//! product of its value lists, with keys taken in sorted order and the last
//! key varying fastest. Sub-grids are concatenated in list order, so the
//! expansion is deterministic and candidate indices are stable across runs.

use crate::domain::{ParamGrid, ParamSet};
use crate::error::AppError;

/// Expand `grid` into concrete parameter sets.
pub fn expand(grid: &ParamGrid) -> Result<Vec<ParamSet>, AppError> {
    let mut out = Vec::new();
    for sub in grid {
        if let Some((key, _)) = sub.iter().find(|(_, values)| values.is_empty()) {
            return Err(AppError::input(format!("Parameter grid entry `{key}` has no values.")));
        }

        // Odometer over the value lists; the last key varies fastest.
        let entries: Vec<_> = sub.iter().collect();
        let mut cursor = vec![0usize; entries.len()];
        'product: loop {
            let mut params = ParamSet::new();
            for (slot, (key, values)) in entries.iter().enumerate() {
                params.insert((*key).clone(), values[cursor[slot]].clone());
            }
            out.push(params);

            let mut pos = entries.len();
            loop {
                if pos == 0 {
                    break 'product;
                }
                pos -= 1;
                cursor[pos] += 1;
                if cursor[pos] < entries[pos].1.len() {
                    continue 'product;
                }
                cursor[pos] = 0;
            }
        }
    }
    Ok(out)
}

/// Number of parameter sets `grid` expands to (no allocation).
pub fn grid_size(grid: &ParamGrid) -> usize {
    grid.iter()
        .map(|sub| sub.values().map(Vec::len).product::<usize>())
        .sum()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::ParamValue;

    fn sub(entries: &[(&str, Vec<ParamValue>)]) -> BTreeMap<String, Vec<ParamValue>> {
        entries.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn expands_sorted_keys_last_fastest() {
        let grid = vec![sub(&[
            ("penalty", vec!["l1".into(), "l2".into()]),
            ("C", vec![ParamValue::Float(0.1), ParamValue::Int(1)]),
        ])];
        let sets = expand(&grid).unwrap();
        let shown: Vec<String> = sets.iter().map(ToString::to_string).collect();
        assert_eq!(
            shown,
            vec![
                "{'C': 0.1, 'penalty': 'l1'}",
                "{'C': 0.1, 'penalty': 'l2'}",
                "{'C': 1, 'penalty': 'l1'}",
                "{'C': 1, 'penalty': 'l2'}",
            ]
        );
        assert_eq!(grid_size(&grid), 4);
    }

    #[test]
    fn concatenates_sub_grids_and_handles_empty_ones() {
        let grid = vec![
            sub(&[("n_neighbors", vec![ParamValue::Int(3), ParamValue::Int(5)])]),
            BTreeMap::new(),
        ];
        let sets = expand(&grid).unwrap();
        assert_eq!(sets.len(), 3);
        assert!(sets[2].is_empty());
        assert_eq!(grid_size(&grid), 3);
    }

    #[test]
    fn three_keys_cover_full_product() {
        let grid = vec![sub(&[
            ("C", vec![ParamValue::Float(0.01), ParamValue::Int(1), ParamValue::Int(100)]),
            ("kernel", vec!["poly".into(), "linear".into(), "rbf".into()]),
            ("degree", vec![ParamValue::Int(1), ParamValue::Int(2), ParamValue::Int(3)]),
        ])];
        let sets = expand(&grid).unwrap();
        assert_eq!(sets.len(), 27);
        assert_eq!(sets[0].to_string(), "{'C': 0.01, 'degree': 1, 'kernel': 'poly'}");
        assert_eq!(sets[1].to_string(), "{'C': 0.01, 'degree': 1, 'kernel': 'linear'}");
        assert_eq!(sets[26].to_string(), "{'C': 100, 'degree': 3, 'kernel': 'rbf'}");
    }

    #[test]
    fn empty_value_list_is_an_error() {
        let grid = vec![sub(&[("C", vec![])])];
        assert_eq!(expand(&grid).unwrap_err().exit_code(), 2);
    }
}

//! Candidate family files (JSON).
//!
//! ```json
//! [{"name": "kNN", "kind": "knn", "grid": [{"n_neighbors": [5, 7, 9]}]}]
//! ```

use std::fs::File;
use std::path::Path;

use crate::domain::CandidateFamily;
use crate::error::AppError;
use crate::fit::grid::expand;

/// Read and validate a family list.
pub fn read_families_json(path: &Path) -> Result<Vec<CandidateFamily>, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open families JSON '{}': {e}", path.display())))?;
    let families: Vec<CandidateFamily> =
        serde_json::from_reader(file).map_err(|e| AppError::input(format!("Invalid families JSON: {e}")))?;

    if families.is_empty() {
        return Err(AppError::input(format!("Families JSON '{}' lists no families.", path.display())));
    }
    for family in &families {
        if family.name.trim().is_empty() {
            return Err(AppError::input("Every family needs a non-empty `name`."));
        }
        if expand(&family.grid)?.is_empty() {
            return Err(AppError::input(format!("Family '{}' has an empty `grid`.", family.name)));
        }
    }
    Ok(families)
}

/// Write a family list (e.g. the defaults, as a starting template).
pub fn write_families_json(path: &Path, families: &[CandidateFamily]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create families JSON '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, families)
        .map_err(|e| AppError::input(format!("Failed to write families JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FamilyKind;
    use crate::fit::candidates::candidate_families;

    #[test]
    fn reads_a_hand_written_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("families.json");
        std::fs::write(
            &path,
            r#"[{"name": "SVM", "kind": "svm", "base": {"C": 1},
                 "grid": [{"kernel": ["linear", "rbf"]}, {"kernel": ["poly"], "degree": [2, 3]}]}]"#,
        )
        .unwrap();

        let families = read_families_json(&path).unwrap();
        assert_eq!(families.len(), 1);
        assert_eq!(families[0].kind, FamilyKind::Svm);
        assert_eq!(families[0].base.to_string(), "{'C': 1}");
        assert_eq!(expand(&families[0].grid).unwrap().len(), 4);
    }

    #[test]
    fn defaults_survive_a_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("defaults.json");
        write_families_json(&path, &candidate_families()).unwrap();
        let back = read_families_json(&path).unwrap();
        let names: Vec<&str> = back.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Majority Classifier", "Logistic Regression Classifier", "kNN", "SVM"]);
    }

    #[test]
    fn empty_list_and_unknown_kind_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, "[]").unwrap();
        assert_eq!(read_families_json(&empty).unwrap_err().exit_code(), 2);

        let unknown = dir.path().join("unknown.json");
        std::fs::write(&unknown, r#"[{"name": "x", "kind": "forest", "grid": [{}]}]"#).unwrap();
        assert_eq!(read_families_json(&unknown).unwrap_err().exit_code(), 2);
    }
}

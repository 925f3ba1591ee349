//! Hyperparameter search and model selection.
//!
//! Responsibilities:
//!
//! - expand parameter grids (`grid`)
//! - score a parameter set with k-fold cross-validation (`cv`)
//! - grid-search one family (`search`, parallel over grid points)
//! - pick the best tuned family on the dev set (`selection`)

pub mod candidates;
pub mod cv;
pub mod grid;
pub mod search;
pub mod selection;

pub use candidates::candidate_families;
pub use search::{SearchOutcome, best_config};
pub use selection::{DevEvaluation, Selection, best_model, select_best};

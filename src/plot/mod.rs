//! Precision-recall curve drawing: terminal (`ascii`) and file (`svg`).

pub mod ascii;
pub mod svg;

pub use ascii::render_pr_ascii;
pub use svg::{PR_TITLE, write_pr_svg};

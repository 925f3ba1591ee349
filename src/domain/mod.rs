//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the labelled dataset (`Dataset`, `Label`)
//! - hyperparameter values, sets and grids (`ParamValue`, `ParamSet`, `ParamGrid`)
//! - candidate families and run configuration (`CandidateFamily`, `SelectConfig`)
//! - search outputs that get exported (`CandidateScore`, `PrCurve`)

pub mod types;

pub use types::*;

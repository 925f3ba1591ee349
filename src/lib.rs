//! `model-select` library crate.
//!
//! The binary (`msel`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the search/selection pieces are reusable from other tools
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod io;
pub mod metrics;
pub mod models;
pub mod plot;
pub mod report;

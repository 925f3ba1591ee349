//! Reporting: console tables for searches, dev evaluations and the candidate list.

pub mod format;

pub use format::*;

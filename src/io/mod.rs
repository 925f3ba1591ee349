//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - candidate family files (`families`)
//! - selection export (`export`)
//! - precision-recall curve JSON read/write (`curve`)

pub mod curve;
pub mod export;
pub mod families;
pub mod ingest;

pub use curve::*;
pub use export::*;
pub use families::*;
pub use ingest::*;

//! Dataset preparation: synthetic demo data and the train/dev split.

pub mod split;
pub mod synthetic;

pub use split::train_dev_split;
pub use synthetic::generate_synthetic;

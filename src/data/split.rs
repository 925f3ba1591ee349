//! Train/dev hold-out split.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::domain::Dataset;
use crate::error::AppError;

/// Shuffle `data` with `seed` and hold out `dev_fraction` of it as the dev set.
///
/// Both sides keep at least one row.
pub fn train_dev_split(data: &Dataset, dev_fraction: f64, seed: u64) -> Result<(Dataset, Dataset), AppError> {
    if !(dev_fraction > 0.0 && dev_fraction < 1.0) {
        return Err(AppError::input(format!("Dev fraction must be in (0, 1), got {dev_fraction}.")));
    }
    if data.len() < 2 {
        return Err(AppError::insufficient("Need at least 2 rows to hold out a dev set."));
    }

    let mut indices: Vec<usize> = (0..data.len()).collect();
    indices.shuffle(&mut StdRng::seed_from_u64(seed));

    let n_dev = ((data.len() as f64 * dev_fraction).round() as usize).clamp(1, data.len() - 1);
    let (dev_idx, train_idx) = indices.split_at(n_dev);
    Ok((data.subset(train_idx), data.subset(dev_idx)))
}

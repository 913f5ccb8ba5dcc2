//! Seeded train/test partitioning.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::common::error::{CrashError, CrashResult};

use super::domain::FeatureSet;

/// Train/test partition of a feature set.
#[derive(Clone, Debug)]
pub struct Split {
    pub train: FeatureSet,
    pub test: FeatureSet,
    /// Source row of every training row, in partition order.
    pub train_rows: Vec<usize>,
    /// Source row of every test row, in partition order.
    pub test_rows: Vec<usize>,
}

/// Number of held-out rows for `n` rows: `ceil(n * fraction)`.
pub fn test_len(n: usize, fraction: f64) -> usize {
    (n as f64 * fraction).ceil() as usize
}

/// Shuffle row indices with a seeded ChaCha8 stream and hold out the first
/// `ceil(n * test_fraction)` of them.
///
/// Identical input order and seed always give the identical partition.
pub fn train_test_split(data: &FeatureSet, test_fraction: f64, seed: u64) -> CrashResult<Split> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(CrashError::config(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }
    let n = data.n_rows();
    let n_test = test_len(n, test_fraction);
    if n_test == 0 || n_test >= n {
        return Err(CrashError::config(format!(
            "cannot split {n} rows with test fraction {test_fraction}: a partition would be empty"
        )));
    }

    let mut rows: Vec<usize> = (0..n).collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rows.shuffle(&mut rng);

    let train_rows = rows.split_off(n_test);
    let test_rows = rows;
    info!(
        seed,
        train = train_rows.len(),
        test = test_rows.len(),
        "train/test split"
    );

    Ok(Split {
        train: data.select(&train_rows),
        test: data.select(&test_rows),
        train_rows,
        test_rows,
    })
}

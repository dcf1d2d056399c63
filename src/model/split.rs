//! Seeded train/test partitioning.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Default held-out fraction.
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;
/// Default shuffle seed.
pub const DEFAULT_SEED: u64 = 42;

/// Split parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitConfig {
    pub test_fraction: f64,
    pub seed: u64,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Partition {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Shuffle `0..n` with a seeded generator and cut off `ceil(n * test_fraction)` test rows.
///
/// The same `n`, fraction and seed always give the same partition.
pub fn split_indices(n: usize, config: SplitConfig) -> Partition {
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(config.seed);
    indices.shuffle(&mut rng);

    let n_test = ((n as f64) * config.test_fraction).ceil() as usize;
    let n_test = n_test.min(n);
    let test = indices.split_off(n - n_test);

    Partition {
        train: indices,
        test,
    }
}

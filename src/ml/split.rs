//! Train/test splitting and K-fold cross-validation indices.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::{DisasterError, Result};

/// Shuffle `0..n` and hold out `ceil(test_size * n)` indices for testing.
///
/// Returns `(train, test)`.
pub fn train_test_split<R: Rng + ?Sized>(
    n: usize,
    test_size: f64,
    rng: &mut R,
) -> Result<(Vec<usize>, Vec<usize>)> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(DisasterError::invalid_argument(format!(
            "test_size must be in (0, 1), got {test_size}"
        )));
    }

    let n_test = (test_size * n as f64).ceil() as usize;
    let n_train = n.saturating_sub(n_test);
    if n_train == 0 {
        return Err(DisasterError::invalid_argument(format!(
            "with {n} samples and test_size={test_size} the training set would be empty"
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(rng);
    let train = permutation.split_off(n_test);
    Ok((train, permutation))
}

/// Unshuffled K-fold splitter.
///
/// The first `n % n_splits` folds hold one extra sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KFold {
    n_splits: usize,
}

impl KFold {
    pub fn new(n_splits: usize) -> Result<Self> {
        if n_splits < 2 {
            return Err(DisasterError::invalid_argument(format!(
                "K-fold needs at least 2 splits, got {n_splits}"
            )));
        }
        Ok(KFold { n_splits })
    }

    pub fn n_splits(&self) -> usize {
        self.n_splits
    }

    /// `(train, validation)` index pairs, one per fold.
    pub fn split(&self, n: usize) -> Result<Vec<(Vec<usize>, Vec<usize>)>> {
        if n < self.n_splits {
            return Err(DisasterError::invalid_argument(format!(
                "cannot split {n} samples into {} folds",
                self.n_splits
            )));
        }

        let base = n / self.n_splits;
        let extra = n % self.n_splits;
        let mut folds = Vec::with_capacity(self.n_splits);
        let mut start = 0;
        for fold in 0..self.n_splits {
            let size = base + usize::from(fold < extra);
            let end = start + size;
            let validation: Vec<usize> = (start..end).collect();
            let train: Vec<usize> = (0..start).chain(end..n).collect();
            folds.push((train, validation));
            start = end;
        }
        Ok(folds)
    }
}

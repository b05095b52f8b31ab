use super::ensure_non_empty;
use crate::{error::QtabError, RandomSource};
use serde::{Deserialize, Serialize};

/// Uniformly random action selection.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy, Default)]
pub struct Random;

impl Random {
    /// Returns a uniformly random index, ignoring the values in `q`.
    pub fn sample_action<R>(&self, q: &[f64], rng: &mut R) -> Result<usize, QtabError>
    where
        R: RandomSource + ?Sized,
    {
        ensure_non_empty(q)?;
        Ok(rng.uniform_int(0, q.len() - 1))
    }
}

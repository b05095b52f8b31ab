use super::ensure_non_empty;
use crate::{error::QtabError, RandomSource};
use serde::{Deserialize, Serialize};

/// Greedy action selection.
///
/// When several actions share the maximal Q-value, one of them is chosen
/// uniformly at random, so no index is favoured by its position.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Copy, Default)]
pub struct Greedy;

impl Greedy {
    /// Returns the index of a maximal Q-value.
    pub fn sample_action<R>(&self, q: &[f64], rng: &mut R) -> Result<usize, QtabError>
    where
        R: RandomSource + ?Sized,
    {
        ensure_non_empty(q)?;
        let best = argmax_all(q);
        match best.len() {
            1 => Ok(best[0]),
            n => Ok(best[rng.uniform_int(0, n - 1)]),
        }
    }
}

/// Indices of every maximal element.
fn argmax_all(q: &[f64]) -> Vec<usize> {
    let max = q.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let best: Vec<usize> = q
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == max)
        .map(|(i, _)| i)
        .collect();
    if best.is_empty() {
        // Only reachable when every value is NaN.
        (0..q.len()).collect()
    } else {
        best
    }
}

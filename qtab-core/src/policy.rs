//! Action-selection policies.
//!
//! A policy turns the Q-values of every action at a state into the index of
//! the action to take. All randomness comes from the [`RandomSource`] passed
//! in by the caller.
mod epsilon_greedy;
mod greedy;
mod random;
mod softmax;
use crate::{error::QtabError, RandomSource};
pub use epsilon_greedy::EpsilonGreedy;
pub use greedy::Greedy;
pub use random::Random;
use serde::{Deserialize, Serialize};
pub use softmax::Softmax;

/// Policies for Q-learning.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub enum Policy {
    /// Always exploit; ties are broken uniformly at random.
    Greedy(Greedy),

    /// Uniformly random, ignoring Q-values.
    Random(Random),

    /// Explore with probability epsilon, exploit otherwise.
    EpsilonGreedy(EpsilonGreedy),

    /// Boltzmann selection with a temperature.
    Softmax(Softmax),
}

impl Default for Policy {
    fn default() -> Self {
        Policy::Greedy(Greedy)
    }
}

impl Policy {
    /// Greedy policy.
    pub fn greedy() -> Self {
        Policy::Greedy(Greedy)
    }

    /// Uniform random policy.
    pub fn random() -> Self {
        Policy::Random(Random)
    }

    /// Epsilon-greedy policy; `epsilon` must lie in `[0, 1]`.
    pub fn epsilon_greedy(epsilon: f64) -> Result<Self, QtabError> {
        Ok(Policy::EpsilonGreedy(EpsilonGreedy::new(epsilon)?))
    }

    /// Softmax policy; `temperature` must be positive.
    pub fn softmax(temperature: f64) -> Result<Self, QtabError> {
        Ok(Policy::Softmax(Softmax::new(temperature)?))
    }

    /// Checks parameters, which matters for policies read from a file.
    pub fn validate(&self) -> Result<(), QtabError> {
        match self {
            Policy::Greedy(_) | Policy::Random(_) => Ok(()),
            Policy::EpsilonGreedy(p) => EpsilonGreedy::new(p.epsilon).map(|_| ()),
            Policy::Softmax(p) => Softmax::new(p.temperature).map(|_| ()),
        }
    }

    /// Returns the index of the chosen action, in `[0, q.len())`.
    pub fn sample_action<R>(&self, q: &[f64], rng: &mut R) -> Result<usize, QtabError>
    where
        R: RandomSource + ?Sized,
    {
        match self {
            Policy::Greedy(p) => p.sample_action(q, rng),
            Policy::Random(p) => p.sample_action(q, rng),
            Policy::EpsilonGreedy(p) => p.sample_action(q, rng),
            Policy::Softmax(p) => p.sample_action(q, rng),
        }
    }
}

fn ensure_non_empty(q: &[f64]) -> Result<(), QtabError> {
    if q.is_empty() {
        Err(QtabError::invalid("cannot sample from an empty list of actions"))
    } else {
        Ok(())
    }
}

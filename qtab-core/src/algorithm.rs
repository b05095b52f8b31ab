//! Learning algorithms.
mod q_learning;
use crate::{error::QtabError, Action, ActionId, ActionSpace, LookupTable, Policy, RandomSource, State, StateSpace};
pub use q_learning::{QLearning, QLearningConfig};

/// A tabular learning algorithm.
///
/// The algorithm owns the [`LookupTable`] and the [`Policy`]. It is driven
/// by the [`Trainer`](crate::Trainer): [`init`](Algorithm::init) once, then
/// [`step`](Algorithm::step) and [`update`](Algorithm::update) for every
/// transition.
pub trait Algorithm {
    /// Fills the table for every pair of `states` × `actions`.
    ///
    /// Must be called exactly once, before any other method.
    fn init(&mut self, states: &StateSpace, actions: &ActionSpace) -> Result<(), QtabError>;

    /// Chooses the action to take in `state`.
    fn step(
        &mut self,
        state: &State,
        actions: &ActionSpace,
        rng: &mut dyn RandomSource,
    ) -> Result<ActionId, QtabError>;

    /// Learns from the transition `previous --action--> current` with `reward`.
    fn update(
        &mut self,
        previous: &State,
        action: &Action,
        reward: f64,
        current: &State,
        actions: &ActionSpace,
    ) -> Result<(), QtabError>;

    /// Assigns the policy after checking its parameters.
    fn set_policy(&mut self, policy: Policy) -> Result<(), QtabError>;

    /// The policy, if one was assigned.
    fn policy(&self) -> Option<&Policy>;

    /// The table of Q-values.
    fn table(&self) -> &LookupTable;
}

//! Problem.
use super::{ActionSpace, Agent, State, StateId, StateSpace};
use crate::Algorithm;
use anyhow::Result;

/// Read-only view of a running trial, given to [`Problem`] hooks.
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
    /// The agent after the transition.
    pub agent: &'a Agent,

    /// All states of the problem.
    pub states: &'a StateSpace,

    /// All actions of the problem.
    pub actions: &'a ActionSpace,
}

impl<'a> Context<'a> {
    /// The state the agent is in.
    pub fn current_state(&self) -> Result<&'a State> {
        Ok(self.states.get(self.agent.current_state())?)
    }

    /// Name of the last action, if any.
    pub fn last_action_name(&self) -> Option<&'a str> {
        self.agent
            .last_action()
            .and_then(|a| self.actions.get(a).ok())
            .map(|a| a.name())
    }
}

/// Represents a learning problem: its states, actions, dynamics and rewards.
///
/// The [`Trainer`](crate::Trainer) calls the setup methods exactly once, in order:
/// [`setup_states`](Problem::setup_states), [`setup_actions`](Problem::setup_actions),
/// [`setup_algorithm`](Problem::setup_algorithm). It then calls
/// [`step`](Problem::step) and [`reward`](Problem::reward) after every action
/// and [`end_of_trial`](Problem::end_of_trial) after every episode.
pub trait Problem {
    /// Registers every state and returns the initial one.
    fn setup_states(&mut self, states: &mut StateSpace) -> Result<StateId>;

    /// Registers every action with its transition effect.
    fn setup_actions(&mut self, states: &StateSpace, actions: &mut ActionSpace) -> Result<()>;

    /// Builds the learning algorithm.
    ///
    /// Returning `None` makes the trainer fall back to Q-learning with
    /// default parameters.
    fn setup_algorithm(&mut self) -> Result<Option<Box<dyn Algorithm>>> {
        Ok(None)
    }

    /// Called when an action reports [`Transition::Blocked`](crate::Transition::Blocked).
    ///
    /// The trainer has already recorded a self-transition: both the current
    /// and the previous state of `agent` are the state the action was taken
    /// from, so [`Agent::rollback`] keeps the agent there. The move is learnt
    /// as a self-transition unless this moves the agent elsewhere.
    fn on_blocked(&mut self, _agent: &mut Agent) -> Result<()> {
        Ok(())
    }

    /// Returns `false` when the episode is over.
    fn step(&mut self, ctx: &Context<'_>) -> Result<bool>;

    /// Reward of the transition just taken.
    fn reward(&mut self, ctx: &Context<'_>) -> Result<f64>;

    /// Called once per finished episode, typically to put the agent back
    /// to its initial state.
    fn end_of_trial(&mut self, agent: &mut Agent, states: &StateSpace) -> Result<()>;
}

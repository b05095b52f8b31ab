//! Agent.
use super::{ActionId, StateId};

/// Where the agent is and what it did last.
///
/// The agent knows nothing about the environment. It is moved by the
/// [`Trainer`](crate::Trainer) and, for invalid moves, by the
/// [`Problem`](crate::Problem).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Agent {
    current: StateId,
    previous: Option<StateId>,
    last_action: Option<ActionId>,
}

impl Agent {
    /// An agent placed in `initial`, with no history.
    pub fn new(initial: StateId) -> Self {
        Self {
            current: initial,
            previous: None,
            last_action: None,
        }
    }

    /// The state the agent is in.
    pub fn current_state(&self) -> StateId {
        self.current
    }

    /// The state the agent was in before the last transition.
    pub fn previous_state(&self) -> Option<StateId> {
        self.previous
    }

    /// The last action taken.
    pub fn last_action(&self) -> Option<ActionId> {
        self.last_action
    }

    /// Moves the agent: previous ← current, current ← `s`.
    pub fn set_state(&mut self, s: StateId) {
        self.previous = Some(self.current);
        self.current = s;
    }

    /// Undoes the last move: current ← previous.
    ///
    /// Does nothing before the first transition.
    pub fn rollback(&mut self) {
        if let Some(prev) = self.previous {
            self.current = prev;
        }
    }

    /// Records the action about to be performed.
    pub fn set_last_action(&mut self, a: ActionId) {
        self.last_action = Some(a);
    }
}

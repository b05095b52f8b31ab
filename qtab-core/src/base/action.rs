//! Actions and the arena that owns them.
use super::{State, StateId, StateSpace};
use crate::error::QtabError;
use std::{collections::HashMap, fmt};

/// Handle of an [`Action`] registered in an [`ActionSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    /// Position of the action in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Outcome of applying an action to a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The agent moves to the given state.
    MoveTo(StateId),

    /// The move is invalid; the problem decides what happens to the agent.
    Blocked,
}

/// Transition effect of an action.
pub type Effect = Box<dyn Fn(&State, &StateSpace) -> Result<Transition, QtabError>>;

/// An action the agent can perform.
pub struct Action {
    name: String,
    effect: Effect,
}

impl Action {
    /// Creates an action with its transition effect.
    pub fn new<F>(name: impl Into<String>, effect: F) -> Self
    where
        F: Fn(&State, &StateSpace) -> Result<Transition, QtabError> + 'static,
    {
        Self {
            name: name.into(),
            effect: Box::new(effect),
        }
    }

    /// Name of the action.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Computes the transition of this action from `state`.
    pub fn perform(&self, state: &State, states: &StateSpace) -> Result<Transition, QtabError> {
        (self.effect)(state, states)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Action").field("name", &self.name).finish()
    }
}

/// Owns every [`Action`] of a problem.
#[derive(Debug, Default)]
pub struct ActionSpace {
    actions: Vec<Action>,
    index: HashMap<String, ActionId>,
}

impl ActionSpace {
    /// An empty action space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an action and returns its handle.
    pub fn add(&mut self, action: Action) -> Result<ActionId, QtabError> {
        if self.index.contains_key(action.name()) {
            return Err(QtabError::invalid(format!(
                "action {:?} is registered twice",
                action.name()
            )));
        }
        let id = ActionId(self.actions.len());
        self.index.insert(action.name().to_string(), id);
        self.actions.push(action);
        Ok(id)
    }

    /// Looks up an action by name.
    pub fn id_of(&self, name: &str) -> Result<ActionId, QtabError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| QtabError::UnknownIdentifier(name.to_string()))
    }

    /// Returns the action of a handle.
    pub fn get(&self, id: ActionId) -> Result<&Action, QtabError> {
        self.actions
            .get(id.0)
            .ok_or_else(|| QtabError::UnknownIdentifier(format!("action #{}", id.0)))
    }

    /// Iterates over handles and actions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &Action)> {
        self.actions.iter().enumerate().map(|(i, a)| (ActionId(i), a))
    }

    /// The number of actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Returns `true` if no action is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> StateSpace {
        let mut states = StateSpace::new();
        for name in ["A", "B"] {
            states.add(State::new(name)).unwrap();
        }
        states
    }

    #[test]
    fn test_perform() {
        let states = line();
        let advance = Action::new("advance", |s: &State, states: &StateSpace| {
            match s.name() {
                "A" => Ok(Transition::MoveTo(states.id_of("B")?)),
                _ => Ok(Transition::Blocked),
            }
        });

        let a = states.get(states.id_of("A").unwrap()).unwrap();
        let b = states.get(states.id_of("B").unwrap()).unwrap();
        assert_eq!(
            advance.perform(a, &states).unwrap(),
            Transition::MoveTo(states.id_of("B").unwrap())
        );
        assert_eq!(advance.perform(b, &states).unwrap(), Transition::Blocked);
    }

    #[test]
    fn test_effect_reports_unknown_state() {
        let states = line();
        let jump = Action::new("jump", |_: &State, states: &StateSpace| {
            Ok(Transition::MoveTo(states.id_of("Z")?))
        });
        let a = states.get(states.id_of("A").unwrap()).unwrap();
        assert_eq!(
            jump.perform(a, &states),
            Err(QtabError::UnknownIdentifier("Z".to_string()))
        );
    }

    #[test]
    fn test_registry() {
        let mut actions = ActionSpace::new();
        let id = actions
            .add(Action::new("noop", |_: &State, _: &StateSpace| Ok(Transition::Blocked)))
            .unwrap();
        assert_eq!(actions.id_of("noop").unwrap(), id);
        assert_eq!(actions.get(id).unwrap().name(), "noop");
        assert!(actions
            .add(Action::new("noop", |_: &State, _: &StateSpace| Ok(Transition::Blocked)))
            .is_err());
        assert!(matches!(
            actions.id_of("jump"),
            Err(QtabError::UnknownIdentifier(_))
        ));
    }
}

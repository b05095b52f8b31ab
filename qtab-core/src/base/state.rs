//! States and the arena that owns them.
use crate::error::QtabError;
use std::collections::HashMap;

/// Handle of a [`State`] registered in a [`StateSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(pub(crate) usize);

impl StateId {
    /// Position of the state in registration order.
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Problem-specific data attached to a state.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// No data beyond the name.
    None,

    /// A position on a 2D grid.
    Coord {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
    },

    /// A position on a 2D grid with a label, e.g. `"danger"`.
    TaggedCoord {
        /// Column.
        x: i32,
        /// Row.
        y: i32,
        /// Label.
        tag: String,
    },
}

impl Payload {
    /// Grid position, if the payload has one.
    pub fn coord(&self) -> Option<(i32, i32)> {
        match self {
            Payload::None => None,
            Payload::Coord { x, y } | Payload::TaggedCoord { x, y, .. } => Some((*x, *y)),
        }
    }

    /// Label, if the payload has one.
    pub fn tag(&self) -> Option<&str> {
        match self {
            Payload::TaggedCoord { tag, .. } => Some(tag.as_str()),
            _ => None,
        }
    }
}

/// A state the agent can be in.
///
/// The identity of a state is its name. Two states with the same name are
/// the same key in the [`LookupTable`](crate::LookupTable).
#[derive(Debug, Clone, PartialEq)]
pub struct State {
    name: String,
    payload: Payload,
}

impl State {
    /// A state without payload.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            payload: Payload::None,
        }
    }

    /// A state with payload.
    pub fn with_payload(name: impl Into<String>, payload: Payload) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }

    /// Name of the state.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload of the state.
    pub fn payload(&self) -> &Payload {
        &self.payload
    }
}

/// Owns every [`State`] of a problem.
#[derive(Debug, Default)]
pub struct StateSpace {
    states: Vec<State>,
    index: HashMap<String, StateId>,
}

impl StateSpace {
    /// An empty state space.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a state and returns its handle.
    ///
    /// Fails if a state with the same name is already registered.
    pub fn add(&mut self, state: State) -> Result<StateId, QtabError> {
        if self.index.contains_key(state.name()) {
            return Err(QtabError::invalid(format!(
                "state {:?} is registered twice",
                state.name()
            )));
        }
        let id = StateId(self.states.len());
        self.index.insert(state.name().to_string(), id);
        self.states.push(state);
        Ok(id)
    }

    /// Looks up a state by name.
    pub fn id_of(&self, name: &str) -> Result<StateId, QtabError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| QtabError::UnknownIdentifier(name.to_string()))
    }

    /// Returns the state of a handle.
    ///
    /// Handles are only created by [`StateSpace::add`], so a handle from another
    /// space is the only way this can fail.
    pub fn get(&self, id: StateId) -> Result<&State, QtabError> {
        self.states
            .get(id.0)
            .ok_or_else(|| QtabError::UnknownIdentifier(format!("state #{}", id.0)))
    }

    /// Iterates over handles and states in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states.iter().enumerate().map(|(i, s)| (StateId(i), s))
    }

    /// The number of states.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Returns `true` if no state is registered.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

//! Core functionalities.
mod action;
mod agent;
mod problem;
mod state;
pub use action::{Action, ActionId, ActionSpace, Effect, Transition};
pub use agent::Agent;
pub use problem::{Context, Problem};
pub use state::{Payload, State, StateId, StateSpace};

#![warn(missing_docs)]
//! Core components of a tabular reinforcement learning engine.
//!
//! A [`Problem`] registers its states and actions in a [`StateSpace`] and an
//! [`ActionSpace`], and tells whether a trial goes on and how much a
//! transition is worth. An [`Algorithm`], by default [`QLearning`], keeps the
//! Q-values in a [`LookupTable`] and chooses actions with a [`Policy`].
//! The [`Trainer`] ties them together and runs trials.
//!
//! ```rust
//! use anyhow::Result;
//! use qtab_core::{
//!     Action, ActionSpace, Agent, Context, Problem, RngSource, State, StateId,
//!     StateSpace, Trainer, TrainerConfig, Transition,
//! };
//!
//! /// Two states; a single action jumps to the terminal one.
//! struct Jump;
//!
//! impl Problem for Jump {
//!     fn setup_states(&mut self, states: &mut StateSpace) -> Result<StateId> {
//!         let start = states.add(State::new("start"))?;
//!         states.add(State::new("end"))?;
//!         Ok(start)
//!     }
//!
//!     fn setup_actions(&mut self, states: &StateSpace, actions: &mut ActionSpace) -> Result<()> {
//!         let end = states.id_of("end")?;
//!         actions.add(Action::new("jump", move |_, _| Ok(Transition::MoveTo(end))))?;
//!         Ok(())
//!     }
//!
//!     fn step(&mut self, ctx: &Context<'_>) -> Result<bool> {
//!         Ok(ctx.current_state()?.name() != "end")
//!     }
//!
//!     fn reward(&mut self, _ctx: &Context<'_>) -> Result<f64> {
//!         Ok(1.0)
//!     }
//!
//!     fn end_of_trial(&mut self, agent: &mut Agent, states: &StateSpace) -> Result<()> {
//!         agent.set_state(states.id_of("start")?);
//!         Ok(())
//!     }
//! }
//!
//! let mut trainer = Trainer::build(Jump, TrainerConfig::default(), RngSource::seed_from_u64(42))?;
//! trainer.run(3)?;
//! assert_eq!(trainer.stats().total_steps, 3);
//! # Ok::<(), anyhow::Error>(())
//! ```
pub mod error;
pub mod policy;
pub mod record;

mod algorithm;
mod base;
mod lookup_table;
mod rng;
mod trainer;

pub use algorithm::{Algorithm, QLearning, QLearningConfig};
pub use base::{
    Action, ActionId, ActionSpace, Agent, Context, Effect, Payload, Problem, State, StateId,
    StateSpace, Transition,
};
pub use error::QtabError;
pub use lookup_table::LookupTable;
pub use policy::Policy;
pub use rng::{RandomSource, RngSource};
pub use trainer::{Phase, Stats, StopSignal, Trainer, TrainerConfig};

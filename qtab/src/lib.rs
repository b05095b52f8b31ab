//! A tabular reinforcement learning library in Rust.
//!
//! qtab consists of the following crates:
//!
//! * [qtab-core](qtab_core) provides the engine: states and actions, the
//!   Q-value lookup table, action-selection policies, Q-learning and the
//!   [`Trainer`](qtab_core::Trainer) running trials on a
//!   [`Problem`](qtab_core::Problem).
//! * [qtab-problems](qtab_problems) has ready-made problems, currently a
//!   configurable grid world.
//! * qtab itself re-exports both and carries runnable examples, e.g.
//!
//! ```bash
//! cargo run --example train_grid -- --preset cliff --trials 500 --seed 42
//! ```
pub use qtab_core as core;
pub use qtab_problems as problems;

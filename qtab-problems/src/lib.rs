#![warn(missing_docs)]
//! Problems for [`qtab_core`].
//!
//! [`GridWorld`] moves an agent on a rectangular grid towards a goal cell,
//! optionally across hazard cells. [`GridConfig::cliff()`] and
//! [`GridConfig::robot()`] are the two classic setups.
mod grid;
pub use grid::{cell_name, GridConfig, GridWorld, HAZARD_TAG};

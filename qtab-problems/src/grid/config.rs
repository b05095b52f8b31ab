//! Configuration of [`GridWorld`](super::GridWorld).
use anyhow::Result;
use qtab_core::{policy::EpsilonGreedy, Policy, QLearningConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`GridWorld`](super::GridWorld).
///
/// Cells are addressed by `(x, y)`, both 1-based; `y` grows upwards.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct GridConfig {
    /// The number of columns.
    pub width: i32,

    /// The number of rows.
    pub height: i32,

    /// Cell where every trial starts.
    pub start: (i32, i32),

    /// Reaching this cell ends the trial.
    pub goal: (i32, i32),

    /// Entering one of these cells ends the trial.
    pub hazards: Vec<(i32, i32)>,

    /// Reward for bumping into the border of the grid.
    pub wall_reward: f64,

    /// Reward for entering a hazard.
    pub hazard_reward: f64,

    /// Reward for a move that is at least as close to the goal as any cell
    /// visited so far in the trial.
    pub closer_reward: f64,

    /// Reward for any other move.
    pub farther_reward: f64,

    /// Configuration of the learning algorithm.
    pub q_learning: QLearningConfig,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self::robot()
    }
}

impl GridConfig {
    /// An 8x3 grid whose bottom and top rows are hazards, except the start
    /// cell `(1, 1)`. The goal `(8, 2)` is at the end of the middle row.
    pub fn cliff() -> Self {
        let hazards = (1..=8)
            .map(|x| (x, 3))
            .chain((2..=8).map(|x| (x, 1)))
            .collect();
        Self {
            width: 8,
            height: 3,
            start: (1, 1),
            goal: (8, 2),
            hazards,
            q_learning: QLearningConfig::default()
                .alpha(1.0)
                .gamma(0.9)
                .policy(Policy::EpsilonGreedy(EpsilonGreedy::default())),
            ..Self::empty(8, 3)
        }
    }

    /// A 10x10 grid without hazards, from `(3, 3)` to `(10, 10)`.
    pub fn robot() -> Self {
        Self {
            start: (3, 3),
            goal: (10, 10),
            q_learning: QLearningConfig::default()
                .alpha(0.2)
                .gamma(0.9)
                .policy(Policy::EpsilonGreedy(EpsilonGreedy::default())),
            ..Self::empty(10, 10)
        }
    }

    fn empty(width: i32, height: i32) -> Self {
        Self {
            width,
            height,
            start: (1, 1),
            goal: (width, height),
            hazards: vec![],
            wall_reward: -50.0,
            hazard_reward: -50.0,
            closer_reward: 10.0,
            farther_reward: -10.0,
            q_learning: QLearningConfig::default(),
        }
    }

    /// Sets the start cell.
    pub fn start(mut self, x: i32, y: i32) -> Self {
        self.start = (x, y);
        self
    }

    /// Sets the goal cell.
    pub fn goal(mut self, x: i32, y: i32) -> Self {
        self.goal = (x, y);
        self
    }

    /// Adds a hazard cell.
    pub fn hazard(mut self, x: i32, y: i32) -> Self {
        self.hazards.push((x, y));
        self
    }

    /// Sets the configuration of the learning algorithm.
    pub fn q_learning(mut self, v: QLearningConfig) -> Self {
        self.q_learning = v;
        self
    }

    /// Constructs [`GridConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`GridConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }

    pub(super) fn contains(&self, (x, y): (i32, i32)) -> bool {
        (1..=self.width).contains(&x) && (1..=self.height).contains(&y)
    }

    pub(super) fn is_hazard(&self, cell: (i32, i32)) -> bool {
        self.hazards.contains(&cell)
    }
}

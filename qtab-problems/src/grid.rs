//! Grid world.
mod config;
use anyhow::{anyhow, Result};
pub use config::GridConfig;
use log::info;
use qtab_core::{
    Action, ActionSpace, Agent, Algorithm, Context, Payload, Problem, QLearning, QtabError,
    State, StateId, StateSpace, Transition,
};

/// Tag of the payload of hazard cells.
pub const HAZARD_TAG: &str = "hazard";

/// Name of the state of cell `(x, y)`, e.g. `"3,1"`.
pub fn cell_name(x: i32, y: i32) -> String {
    format!("{},{}", x, y)
}

fn manhattan((x1, y1): (i32, i32), (x2, y2): (i32, i32)) -> i32 {
    (x1 - x2).abs() + (y1 - y2).abs()
}

/// An agent walks on a grid towards the goal cell.
///
/// There is one state per cell and four actions, `Move Left`, `Move Right`,
/// `Move Up` and `Move Down`. Moving off the grid is blocked: the agent
/// stays where it is and gets [`GridConfig::wall_reward`]. A trial ends when
/// the agent enters the goal or a hazard.
///
/// Other moves are rewarded relative to the closest the agent has been to
/// the goal in the current trial, measured by Manhattan distance.
pub struct GridWorld {
    config: GridConfig,
    best_distance: i32,
    bumped: bool,
}

impl GridWorld {
    /// Constructs a grid world, checking the configuration.
    pub fn new(config: GridConfig) -> Result<Self> {
        let invalid = |msg: String| -> Result<Self> {
            Err(QtabError::InvalidConfiguration(msg).into())
        };
        if config.width < 1 || config.height < 1 {
            return invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                config.width, config.height
            ));
        }
        for (what, cell) in [("start", config.start), ("goal", config.goal)] {
            if !config.contains(cell) {
                return invalid(format!("{} {:?} is outside the grid", what, cell));
            }
            if config.is_hazard(cell) {
                return invalid(format!("{} {:?} is a hazard", what, cell));
            }
        }
        if let Some(cell) = config.hazards.iter().find(|&&c| !config.contains(c)) {
            return invalid(format!("hazard {:?} is outside the grid", cell));
        }

        Ok(Self {
            best_distance: manhattan(config.start, config.goal),
            config,
            bumped: false,
        })
    }

    /// The configuration.
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    fn coord(state: &State) -> Result<(i32, i32)> {
        state
            .payload()
            .coord()
            .ok_or_else(|| anyhow!("state {:?} is not a grid cell", state.name()))
    }

    fn is_goal(&self, cell: (i32, i32)) -> bool {
        cell == self.config.goal
    }
}

impl Problem for GridWorld {
    fn setup_states(&mut self, states: &mut StateSpace) -> Result<StateId> {
        for x in 1..=self.config.width {
            for y in 1..=self.config.height {
                let payload = if self.config.is_hazard((x, y)) {
                    Payload::TaggedCoord {
                        x,
                        y,
                        tag: HAZARD_TAG.to_string(),
                    }
                } else {
                    Payload::Coord { x, y }
                };
                states.add(State::with_payload(cell_name(x, y), payload))?;
            }
        }
        info!(
            "Grid {}x{} from {:?} to {:?} with {} hazards",
            self.config.width,
            self.config.height,
            self.config.start,
            self.config.goal,
            self.config.hazards.len()
        );

        let (x, y) = self.config.start;
        Ok(states.id_of(&cell_name(x, y))?)
    }

    fn setup_actions(&mut self, _states: &StateSpace, actions: &mut ActionSpace) -> Result<()> {
        let moves = [
            ("Move Left", -1, 0),
            ("Move Right", 1, 0),
            ("Move Up", 0, 1),
            ("Move Down", 0, -1),
        ];
        for (name, dx, dy) in moves {
            let (width, height) = (self.config.width, self.config.height);
            actions.add(Action::new(name, move |state, space| {
                let (x, y) = state.payload().coord().ok_or_else(|| {
                    QtabError::InvalidConfiguration(format!(
                        "state {:?} is not a grid cell",
                        state.name()
                    ))
                })?;
                let (x, y) = (x + dx, y + dy);
                if x < 1 || x > width || y < 1 || y > height {
                    Ok(Transition::Blocked)
                } else {
                    space.id_of(&cell_name(x, y)).map(Transition::MoveTo)
                }
            }))?;
        }
        Ok(())
    }

    fn setup_algorithm(&mut self) -> Result<Option<Box<dyn Algorithm>>> {
        let algorithm: Box<dyn Algorithm> =
            Box::new(QLearning::build(self.config.q_learning.clone())?);
        Ok(Some(algorithm))
    }

    fn on_blocked(&mut self, _agent: &mut Agent) -> Result<()> {
        self.bumped = true;
        Ok(())
    }

    fn step(&mut self, ctx: &Context<'_>) -> Result<bool> {
        let state = ctx.current_state()?;
        let cell = Self::coord(state)?;
        Ok(!self.is_goal(cell) && state.payload().tag() != Some(HAZARD_TAG))
    }

    fn reward(&mut self, ctx: &Context<'_>) -> Result<f64> {
        if self.bumped {
            self.bumped = false;
            return Ok(self.config.wall_reward);
        }

        let state = ctx.current_state()?;
        if state.payload().tag() == Some(HAZARD_TAG) {
            return Ok(self.config.hazard_reward);
        }

        let distance = manhattan(Self::coord(state)?, self.config.goal);
        if distance <= self.best_distance {
            self.best_distance = distance;
            Ok(self.config.closer_reward)
        } else {
            Ok(self.config.farther_reward)
        }
    }

    fn end_of_trial(&mut self, agent: &mut Agent, states: &StateSpace) -> Result<()> {
        let (x, y) = self.config.start;
        agent.set_state(states.id_of(&cell_name(x, y))?);
        self.best_distance = manhattan(self.config.start, self.config.goal);
        self.bumped = false;
        Ok(())
    }
}

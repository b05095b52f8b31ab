//! Configuration of [`Trainer`](super::Trainer).
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Trainer`](super::Trainer).
#[derive(Debug, Deserialize, Serialize, PartialEq, Eq, Clone)]
pub struct TrainerConfig {
    /// Episodes longer than this are cut and counted as finished.
    ///
    /// `None` runs every episode until the problem terminates it.
    pub max_steps_per_trial: Option<usize>,

    /// Interval of logging progress, in episodes.
    pub log_interval: usize,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            max_steps_per_trial: None,
            log_interval: 100,
        }
    }
}

impl TrainerConfig {
    /// Sets the maximum number of steps of an episode.
    pub fn max_steps_per_trial(mut self, v: usize) -> Self {
        self.max_steps_per_trial = Some(v);
        self
    }

    /// Sets the interval of logging in episodes.
    pub fn log_interval(mut self, v: usize) -> Self {
        self.log_interval = v;
        self
    }

    /// Constructs [`TrainerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

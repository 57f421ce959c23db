//! Configuration of [`Runner`](super::Runner).
use crate::error::EpisodicError;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`Runner`](super::Runner).
///
/// It is constructed once and passed by reference to the runner and the
/// episode executor; it does not change during a run.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct RunnerConfig {
    /// The number of episodes to run.
    pub max_episodes: usize,

    /// The maximum number of timesteps in an episode.
    ///
    /// An episode reaching this bound without a terminal signal is truncated.
    pub max_timesteps_per_episode: usize,

    /// The number of environment steps each action is applied for.
    pub action_repeat: usize,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_episodes: 10000,
            max_timesteps_per_episode: 2000,
            action_repeat: 4,
        }
    }
}

impl RunnerConfig {
    /// Sets the number of episodes.
    pub fn max_episodes(mut self, v: usize) -> Self {
        self.max_episodes = v;
        self
    }

    /// Sets the maximum number of timesteps in an episode.
    pub fn max_timesteps_per_episode(mut self, v: usize) -> Self {
        self.max_timesteps_per_episode = v;
        self
    }

    /// Sets the number of repeats of each action.
    pub fn action_repeat(mut self, v: usize) -> Self {
        self.action_repeat = v;
        self
    }

    /// Checks the values, rejecting zero timestep budgets and zero action repeats.
    pub fn validate(&self) -> Result<(), EpisodicError> {
        if self.max_timesteps_per_episode == 0 {
            return Err(EpisodicError::ConfigurationError(
                "max_timesteps_per_episode must be positive".to_string(),
            ));
        }
        if self.action_repeat == 0 {
            return Err(EpisodicError::ConfigurationError(
                "action_repeat must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Constructs [`RunnerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`RunnerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

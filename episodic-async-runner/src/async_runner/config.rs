use anyhow::Result;
use episodic_core::{EpisodicError, RunnerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`AsyncRunner`](crate::AsyncRunner).
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct AsyncRunnerConfig {
    /// Episode budget and per-episode settings, shared by all workers.
    ///
    /// `max_episodes` is the total over all workers.
    pub runner: RunnerConfig,

    /// The number of workers, each with its own environment.
    pub n_workers: usize,
}

impl Default for AsyncRunnerConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            n_workers: 4,
        }
    }
}

impl AsyncRunnerConfig {
    /// Sets the configuration of the episode loop.
    pub fn runner(mut self, v: RunnerConfig) -> Self {
        self.runner = v;
        self
    }

    /// Sets the number of workers.
    pub fn n_workers(mut self, v: usize) -> Self {
        self.n_workers = v;
        self
    }

    /// Checks the values.
    pub fn validate(&self) -> Result<(), EpisodicError> {
        if self.n_workers == 0 {
            return Err(EpisodicError::ConfigurationError(
                "n_workers must be positive".to_string(),
            ));
        }
        self.runner.validate()
    }

    /// Constructs [`AsyncRunnerConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`AsyncRunnerConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_async_runner_config() -> Result<()> {
        let config = AsyncRunnerConfig::default()
            .n_workers(2)
            .runner(RunnerConfig::default().max_episodes(10));

        let dir = TempDir::new("async_runner_config")?;
        let path = dir.path().join("async_runner_config.yaml");
        config.save(&path)?;
        assert_eq!(config, AsyncRunnerConfig::load(&path)?);
        Ok(())
    }

    #[test]
    fn test_zero_workers_is_rejected() {
        assert!(matches!(
            AsyncRunnerConfig::default().n_workers(0).validate(),
            Err(EpisodicError::ConfigurationError(_))
        ));
    }
}

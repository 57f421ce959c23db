//! Configuration of a training run.
use crate::{corridor::CorridorConfig, q_learning::QLearningConfig};
use anyhow::Result;
use episodic_async_runner::AsyncRunnerConfig;
use episodic_core::{exploration::ExplorerConfig, RunnerConfig};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of a training run, stored as YAML.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct TrainConfig {
    /// Episode budget and per-episode settings.
    pub runner: RunnerConfig,

    /// The number of workers. With a single worker episodes run sequentially.
    pub n_workers: usize,

    /// Exploration schedule.
    pub exploration: ExplorerConfig,

    /// The environment.
    #[serde(default)]
    pub corridor: CorridorConfig,

    /// The agent.
    #[serde(default)]
    pub agent: QLearningConfig,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            runner: RunnerConfig::default(),
            n_workers: 4,
            exploration: ExplorerConfig::default(),
            corridor: CorridorConfig::default(),
            agent: QLearningConfig::default(),
        }
    }
}

impl TrainConfig {
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

    /// Sets the exploration schedule.
    pub fn exploration(mut self, v: ExplorerConfig) -> Self {
        self.exploration = v;
        self
    }

    /// Sets the environment.
    pub fn corridor(mut self, v: CorridorConfig) -> Self {
        self.corridor = v;
        self
    }

    /// Sets the agent.
    pub fn agent(mut self, v: QLearningConfig) -> Self {
        self.agent = v;
        self
    }

    /// Configuration of the asynchronous runner.
    pub fn async_runner_config(&self) -> AsyncRunnerConfig {
        AsyncRunnerConfig::default()
            .runner(self.runner.clone())
            .n_workers(self.n_workers)
    }

    /// Constructs [`TrainConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`TrainConfig`].
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
    fn test_serde_train_config() -> Result<()> {
        let config = TrainConfig::default()
            .n_workers(2)
            .runner(RunnerConfig::default().max_episodes(50))
            .exploration(ExplorerConfig::Constant { epsilon: 0.2 })
            .corridor(CorridorConfig::default().length(5));

        let dir = TempDir::new("train_config")?;
        let path = dir.path().join("train_config.yaml");
        config.save(&path)?;
        let config_ = TrainConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_env_and_agent_sections_are_optional() -> Result<()> {
        let yaml = r#"
runner:
  max_episodes: 20
  max_timesteps_per_episode: 100
  action_repeat: 1
n_workers: 3
exploration:
  type: epsilon_anneal
  epsilon_final: 0.05
  epsilon_timesteps: 500
"#;
        let config: TrainConfig = serde_yaml::from_str(yaml)?;
        assert_eq!(config.n_workers, 3);
        assert_eq!(config.corridor, CorridorConfig::default());
        assert_eq!(config.async_runner_config().runner.max_episodes, 20);
        Ok(())
    }
}

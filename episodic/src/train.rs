//! Trains [`QLearning`] on the [`Corridor`].
use crate::{
    config::TrainConfig,
    corridor::Corridor,
    monitor::{write_csv, MonitoredEnv, MonitoredEnvConfig},
    q_learning::QLearning,
};
use anyhow::Result;
use episodic_async_runner::{worker_stats_fmt, AsyncRunner};
use episodic_core::{Env, Progress, RunHistory, Runner};
use log::info;
use std::path::Path;

type TrainEnv = MonitoredEnv<Corridor>;

/// Logs a summary every `interval` finished episodes.
pub struct Reporter {
    interval: usize,
}

impl Reporter {
    /// Reports ten times over a run of `max_episodes` episodes.
    pub fn new(max_episodes: usize) -> Self {
        Self {
            interval: (max_episodes / 10).max(1),
        }
    }

    /// Number of episodes between reports.
    pub fn interval(&self) -> usize {
        self.interval
    }

    /// Returns `true` if a report is due after `n_episodes` finished episodes.
    pub fn is_due(&self, n_episodes: usize) -> bool {
        n_episodes > 0 && n_episodes % self.interval == 0
    }

    /// Episode-finished callback. Never asks the runner to stop.
    pub fn episode_finished<P: Progress>(&self, progress: &P) -> Result<bool> {
        let n = progress.episode();
        if !self.is_due(n) {
            return Ok(true);
        }

        let history = progress.history();
        if let Some(last) = history.last() {
            info!(
                "Finished episode {} after {} timesteps",
                n,
                progress.timestep()
            );
            info!("Total reward: {}", last.total_reward);
            info!(
                "Average of last 500 rewards: {}",
                history.mean_reward_last(500).unwrap_or(0.0)
            );
            info!(
                "Average of last 100 rewards: {}",
                history.mean_reward_last(100).unwrap_or(0.0)
            );
            info!("Exploration rate: {:.4}", progress.epsilon());
        }
        Ok(true)
    }
}

/// Trains an agent as configured.
///
/// With `n_workers == 1` episodes run on [`Runner`], otherwise on
/// [`AsyncRunner`]. If `monitor` is given, every environment step is written
/// there as a CSV row.
pub fn train(config: &TrainConfig, monitor: Option<&Path>) -> Result<(QLearning, RunHistory)> {
    let explorer = config.exploration.build()?;
    let env_config = MonitoredEnvConfig::new(config.corridor.clone());
    let agent = QLearning::build(&config.agent, config.corridor.length);
    let reporter = Reporter::new(config.runner.max_episodes);

    info!(
        "Starting Q-learning on a corridor of {} cells",
        config.corridor.length
    );

    let (agent, history) = match config.n_workers {
        1 => {
            let env = TrainEnv::build(&env_config, 0)?;
            let mut runner = Runner::build(config.runner.clone(), agent, env, explorer)?;
            runner.run(|r| reporter.episode_finished(r))?;
            runner.into_parts()
        }
        _ => {
            let mut runner = AsyncRunner::<TrainEnv, _, _>::build(
                config.async_runner_config(),
                env_config.clone(),
                agent,
                explorer,
            )?;
            runner.run(|r| reporter.episode_finished(r))?;
            info!("\n{}", worker_stats_fmt(runner.worker_stats()));
            runner.into_parts()?
        }
    };

    info!("Learning finished. Total episodes: {}", history.len());

    if let Some(path) = monitor {
        let records = env_config.drain()?;
        info!("Writing {} monitor records to {:?}", records.len(), path);
        write_csv(path, &records)?;
    }

    Ok((agent, history))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_interval() {
        assert_eq!(Reporter::new(10000).interval(), 1000);
        assert_eq!(Reporter::new(5).interval(), 1);

        let reporter = Reporter::new(100);
        assert!(!reporter.is_due(0));
        assert!(!reporter.is_due(5));
        assert!(reporter.is_due(10));
        assert!(reporter.is_due(100));
    }
}

//! Run episodes of an [`Agent`] in an [`Env`].
mod config;
mod executor;
mod history;
use crate::{
    exploration::{Exploration, ExplorationSchedule},
    Agent, EpisodicError, Env,
};
pub use config::RunnerConfig;
pub use executor::EpisodeExecutor;
pub use history::{EpisodeRecord, RunHistory};
use log::{info, warn};

/// Lifecycle of a runner.
///
/// `Idle -> Running -> {Completed, Stopped, Failed}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerState {
    /// Not started.
    Idle,

    /// Running episodes.
    Running,

    /// All episodes were run.
    Completed,

    /// The episode-finished callback asked to stop.
    Stopped,

    /// An episode or the callback failed.
    Failed,
}

impl RunnerState {
    /// Returns `true` for `Completed`, `Stopped` and `Failed`.
    pub fn is_finished(&self) -> bool {
        matches!(self, Self::Completed | Self::Stopped | Self::Failed)
    }
}

/// Read access to the progress of a run, given to episode-finished callbacks.
pub trait Progress {
    /// Finished episodes.
    fn history(&self) -> &RunHistory;

    /// Timesteps elapsed in the run.
    fn timestep(&self) -> usize;

    /// The most recent exploration rate.
    fn epsilon(&self) -> f64;

    /// The number of finished episodes.
    fn episode(&self) -> usize {
        self.history().len()
    }
}

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs episodes one after another.
///
/// # Run loop
///
/// 1. While fewer than `max_episodes` episodes have finished:
///     1. Run an episode with [`EpisodeExecutor`]. The exploration schedule is
///        advanced once per timestep.
///     2. Append the [`EpisodeRecord`] to the [`RunHistory`].
///     3. Call the episode-finished callback with the runner. `Ok(false)` stops
///        the run; an error fails it.
/// 2. Otherwise the run is completed.
///
/// The callback is the only way to cancel a run. It is called synchronously,
/// once per finished episode and before the next one begins, so it can safely
/// read the whole history.
///
/// ```mermaid
/// stateDiagram-v2
///     [*] --> Idle
///     Idle --> Running: run()
///     Running --> Running: callback returns true
///     Running --> Completed: max_episodes reached
///     Running --> Stopped: callback returns false
///     Running --> Failed: episode or callback error
/// ```
pub struct Runner<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    agent: A,
    env: E,
    schedule: ExplorationSchedule<X>,
    executor: EpisodeExecutor,
    config: RunnerConfig,
    history: RunHistory,
    state: RunnerState,
}

impl<E, A, X> Runner<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    /// Constructs a runner.
    ///
    /// Fails with [`EpisodicError::ConfigurationError`] if the configuration is
    /// invalid; the run never starts in that case.
    pub fn build(config: RunnerConfig, agent: A, env: E, explorer: X) -> Result<Self, EpisodicError> {
        config.validate()?;
        Ok(Self {
            agent,
            env,
            schedule: ExplorationSchedule::new(explorer),
            executor: EpisodeExecutor::new(&config),
            config,
            history: RunHistory::new(),
            state: RunnerState::Idle,
        })
    }

    /// Runs episodes until `max_episodes` is reached or `episode_finished`
    /// returns `Ok(false)`.
    ///
    /// Returns the final state, [`RunnerState::Completed`] or
    /// [`RunnerState::Stopped`]. On failure the runner moves to
    /// [`RunnerState::Failed`] and the error names the episode.
    /// A runner runs only once.
    pub fn run<F>(&mut self, mut episode_finished: F) -> Result<RunnerState, EpisodicError>
    where
        F: FnMut(&Self) -> anyhow::Result<bool>,
    {
        if self.state != RunnerState::Idle {
            return Err(EpisodicError::ConfigurationError(format!(
                "runner cannot be started in state {:?}",
                self.state
            )));
        }
        self.state = RunnerState::Running;
        info!("Starts running {} episodes", self.config.max_episodes);

        while self.history.len() < self.config.max_episodes {
            let episode = self.history.len();
            let record = match self.executor.run_episode(
                &mut self.agent,
                &mut self.env,
                &mut self.schedule,
                episode,
            ) {
                Ok(record) => record,
                Err(e) => {
                    warn!("Run failed: {}", e);
                    self.state = RunnerState::Failed;
                    return Err(e);
                }
            };
            self.history.push(record);

            match episode_finished(self) {
                Ok(true) => {}
                Ok(false) => {
                    info!("Stopped by callback after episode {}", episode);
                    self.state = RunnerState::Stopped;
                    return Ok(self.state);
                }
                Err(e) => {
                    let e = EpisodicError::ExecutionError {
                        episode,
                        source: e.context("episode-finished callback failed"),
                    };
                    warn!("Run failed: {}", e);
                    self.state = RunnerState::Failed;
                    return Err(e);
                }
            }
        }

        info!("Finished {} episodes", self.history.len());
        self.state = RunnerState::Completed;
        Ok(self.state)
    }

    /// Current state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// The agent.
    pub fn agent(&self) -> &A {
        &self.agent
    }

    /// The environment.
    pub fn env(&self) -> &E {
        &self.env
    }

    /// Current state of the exploration schedule.
    pub fn explorer(&self) -> &X {
        self.schedule.explorer()
    }

    /// Consumes the runner, returning the agent and the history.
    pub fn into_parts(self) -> (A, RunHistory) {
        (self.agent, self.history)
    }
}

impl<E, A, X> Progress for Runner<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    fn history(&self) -> &RunHistory {
        &self.history
    }

    fn timestep(&self) -> usize {
        self.schedule.timestep()
    }

    fn epsilon(&self) -> f64 {
        self.schedule.epsilon()
    }
}

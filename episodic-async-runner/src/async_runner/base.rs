use crate::{AsyncRunnerConfig, Worker, WorkerMessage, WorkerStat};
use crossbeam_channel::unbounded;
use episodic_core::{
    exploration::{Exploration, SharedSchedule},
    Agent, EpisodeExecutor, EpisodicError, Env, Progress, RunHistory, RunnerState, SharedAgent,
};
use log::{info, warn};
use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    thread,
};

#[cfg_attr(doc, aquamarine::aquamarine)]
/// Runs episodes on several worker threads sharing one agent.
///
/// Each [`Worker`] builds its own environment from the environment
/// configuration and runs the episode loop of
/// [`Runner`](episodic_core::Runner) on it. The agent and the exploration
/// schedule are shared behind mutexes ([`SharedAgent`], [`SharedSchedule`]).
///
/// Episode indices are claimed from a shared counter before an episode
/// starts, so exactly `max_episodes` episodes are run and no index is used
/// twice. Indices are increasing per worker, but completions of different
/// workers arrive in any order.
///
/// Workers send their results over a channel to an aggregator, which runs on the
/// thread calling [`AsyncRunner::run`]. For every finished episode the
/// aggregator appends the record to the history and then calls the
/// episode-finished callback, so callbacks never overlap and a callback always
/// sees the record it is called for.
///
/// ```mermaid
/// graph LR
///     W0[Worker 0 + Env] -->|WorkerMessage| G[Aggregator]
///     W1[Worker 1 + Env] -->|WorkerMessage| G
///     W0 --> A[SharedAgent]
///     W1 --> A
///     W0 --> S[SharedSchedule]
///     W1 --> S
///     G --> H[RunHistory]
///     G --> C[episode-finished callback]
/// ```
///
/// The run stops when the episode budget is used up, the callback returns
/// `Ok(false)` or an error occurs. A worker does not claim a new episode until
/// the aggregator has handled its previous one, so after a stop at episode `N`
/// at most `n_workers - 1` further episodes are recorded. Those are appended
/// to the history without calling the callback. [`AsyncRunner::run`] returns after
/// every worker has exited, with the first error observed, if any.
///
/// There is no per-step deadline: an environment or agent that never returns
/// blocks its worker, and hence the run, indefinitely.
pub struct AsyncRunner<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    config: AsyncRunnerConfig,
    env_config: E::Config,
    agent: SharedAgent<A>,
    schedule: SharedSchedule<X>,
    history: RunHistory,
    state: RunnerState,
    timestep: usize,
    epsilon: f64,
    worker_stats: Vec<WorkerStat>,
}

impl<E, A, X> AsyncRunner<E, A, X>
where
    E: Env + 'static,
    A: Agent<E> + Send + 'static,
    X: Exploration + Send + 'static,
    E::Config: Send + 'static,
{
    /// Builds an [`AsyncRunner`].
    pub fn build(
        config: AsyncRunnerConfig,
        env_config: E::Config,
        agent: A,
        explorer: X,
    ) -> Result<Self, EpisodicError> {
        config.validate()?;
        let epsilon = explorer.epsilon();
        Ok(Self {
            config,
            env_config,
            agent: SharedAgent::new(agent),
            schedule: SharedSchedule::new(explorer),
            history: RunHistory::new(),
            state: RunnerState::Idle,
            timestep: 0,
            epsilon,
            worker_stats: vec![],
        })
    }

    /// Runs workers until the episode budget is used up or `episode_finished`
    /// returns `Ok(false)`.
    ///
    /// `episode_finished` is called on the calling thread, never concurrently
    /// with itself.
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
        info!(
            "Starts running {} episodes on {} workers",
            self.config.runner.max_episodes, self.config.n_workers
        );

        let stop = Arc::new(AtomicBool::new(false));
        let next_episode = Arc::new(AtomicUsize::new(0));
        let guard_init_env = Arc::new(Mutex::new(()));
        let executor = EpisodeExecutor::new(&self.config.runner);
        let (sender, receiver) = unbounded();

        let threads = (0..self.config.n_workers)
            .map(|id| {
                let worker = Worker::<E, A, X>::build(
                    id,
                    self.env_config.clone(),
                    self.agent.clone(),
                    self.schedule.clone(),
                    executor.clone(),
                    self.config.runner.max_episodes,
                    next_episode.clone(),
                    stop.clone(),
                );
                let sender = sender.clone();
                let guard = guard_init_env.clone();
                let stop = stop.clone();

                thread::spawn(move || {
                    let sender_ = sender.clone();
                    let result = panic::catch_unwind(AssertUnwindSafe(move || {
                        worker.run(sender, guard);
                    }));
                    if result.is_err() {
                        stop.store(true, Ordering::SeqCst);
                        let _ = sender_.send(WorkerMessage::Failed {
                            worker_id: id,
                            error: EpisodicError::WorkerPanicked(id),
                        });
                    }
                })
            })
            .collect::<Vec<_>>();

        // The loop below ends when every worker has dropped its sender
        drop(sender);

        let mut first_error: Option<EpisodicError> = None;
        let mut stopped = false;

        for msg in receiver.iter() {
            match msg {
                WorkerMessage::EpisodeFinished {
                    worker_id,
                    record,
                    ack,
                } => {
                    let episode = record.episode_index;
                    self.history.push(record);
                    if let Err(e) = self.sync_schedule() {
                        first_error.get_or_insert(e);
                        stop.store(true, Ordering::SeqCst);
                    }

                    if !stopped && first_error.is_none() {
                        match episode_finished(self) {
                            Ok(true) => {}
                            Ok(false) => {
                                info!(
                                    "Stopped by callback after episode {} of worker {}",
                                    episode, worker_id
                                );
                                stopped = true;
                                stop.store(true, Ordering::SeqCst);
                            }
                            Err(e) => {
                                first_error.get_or_insert(EpisodicError::ExecutionError {
                                    episode,
                                    source: e.context("episode-finished callback failed"),
                                });
                                stop.store(true, Ordering::SeqCst);
                            }
                        }
                    }

                    // The worker sees the stop flag before it can claim another episode
                    let _ = ack.send(());
                }
                WorkerMessage::Failed { worker_id, error } => {
                    warn!("Worker {} failed: {}", worker_id, error);
                    // A poisoned lock is a consequence of a panic reported by another worker
                    let replace = match &first_error {
                        Some(e) => e.is_lock_poisoned() && !error.is_lock_poisoned(),
                        None => true,
                    };
                    if replace {
                        first_error = Some(error);
                    }
                    stop.store(true, Ordering::SeqCst);
                }
                WorkerMessage::Exited(stat) => {
                    self.worker_stats.push(stat);
                }
            }
        }

        for (id, handle) in threads.into_iter().enumerate() {
            if handle.join().is_err() {
                first_error.get_or_insert(EpisodicError::WorkerPanicked(id));
            }
        }
        self.worker_stats.sort_by_key(|s| s.worker_id);

        if let Some(e) = first_error {
            warn!("Run failed: {}", e);
            self.state = RunnerState::Failed;
            return Err(e);
        }

        self.state = if stopped {
            RunnerState::Stopped
        } else {
            RunnerState::Completed
        };
        info!(
            "Finished {} episodes, {} timesteps",
            self.history.len(),
            self.timestep
        );
        Ok(self.state)
    }

    /// Takes a snapshot of the shared schedule for [`Progress`].
    fn sync_schedule(&mut self) -> Result<(), EpisodicError> {
        self.timestep = self.schedule.timestep()?;
        self.epsilon = self.schedule.epsilon()?;
        Ok(())
    }

    /// Current state.
    pub fn state(&self) -> RunnerState {
        self.state
    }

    /// Configuration.
    pub fn config(&self) -> &AsyncRunnerConfig {
        &self.config
    }

    /// The shared agent.
    pub fn agent(&self) -> &SharedAgent<A> {
        &self.agent
    }

    /// Stats of workers, available after [`AsyncRunner::run`] returns.
    pub fn worker_stats(&self) -> &[WorkerStat] {
        &self.worker_stats
    }

    /// Consumes the runner, returning the agent and the history.
    ///
    /// Fails with [`EpisodicError::AgentInUse`] if a clone of the shared agent
    /// is still alive, or with [`EpisodicError::LockPoisoned`] if a worker
    /// panicked while holding the agent.
    pub fn into_parts(self) -> Result<(A, RunHistory), EpisodicError> {
        let agent = self.agent.try_unwrap()?;
        Ok((agent, self.history))
    }
}

impl<E, A, X> Progress for AsyncRunner<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    fn history(&self) -> &RunHistory {
        &self.history
    }

    fn timestep(&self) -> usize {
        self.timestep
    }

    fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

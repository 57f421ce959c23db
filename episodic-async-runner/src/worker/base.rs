use crate::{WorkerMessage, WorkerStat};
use crossbeam_channel::{bounded, Sender};
use episodic_core::{
    exploration::{Exploration, SharedSchedule},
    Agent, EpisodeExecutor, EpisodicError, Env, SharedAgent,
};
use log::{debug, info, warn};
use std::{
    any::Any,
    marker::PhantomData,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicBool, AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::Instant,
};

/// Runs episodes on an environment it owns, with an agent and an exploration
/// schedule shared with other workers.
///
/// Finished episodes are sent to the aggregator of
/// [`AsyncRunner`](crate::AsyncRunner) as [`WorkerMessage`]s.
pub struct Worker<E, A, X>
where
    E: Env,
{
    id: usize,
    env_config: E::Config,
    agent: SharedAgent<A>,
    schedule: SharedSchedule<X>,
    executor: EpisodeExecutor,
    max_episodes: usize,

    /// Next episode index to be claimed, shared by all workers.
    next_episode: Arc<AtomicUsize>,

    /// Stops the episode loop if set to `true`.
    stop: Arc<AtomicBool>,

    phantom: PhantomData<fn() -> E>,
}

impl<E, A, X> Worker<E, A, X>
where
    E: Env,
    A: Agent<E>,
    X: Exploration,
{
    /// Builds a worker.
    #[allow(clippy::too_many_arguments)]
    pub fn build(
        id: usize,
        env_config: E::Config,
        agent: SharedAgent<A>,
        schedule: SharedSchedule<X>,
        executor: EpisodeExecutor,
        max_episodes: usize,
        next_episode: Arc<AtomicUsize>,
        stop: Arc<AtomicBool>,
    ) -> Self {
        Self {
            id,
            env_config,
            agent,
            schedule,
            executor,
            max_episodes,
            next_episode,
            stop,
            phantom: PhantomData,
        }
    }

    /// Runs episodes until the episode budget is used up or `stop` is set.
    ///
    /// The environment is built with the worker id as its seed, while holding
    /// `guard_init_env`, so environments are never initialized simultaneously.
    /// The stop flag is checked between episodes only; an episode in flight is
    /// always run to its end. After sending a finished episode, the worker
    /// waits until the aggregator has handled it, so at most one record per
    /// worker is pending at any time.
    ///
    /// A panic inside an episode is reported as an
    /// [`EpisodicError::ExecutionError`] carrying the episode index.
    pub fn run(mut self, sender: Sender<WorkerMessage>, guard_init_env: Arc<Mutex<()>>) {
        let start = Instant::now();
        let mut stat = WorkerStat {
            worker_id: self.id,
            ..Default::default()
        };

        match self.build_env(&guard_init_env) {
            Ok(mut env) => self.episode_loop(&mut env, &sender, &mut stat),
            Err(error) => {
                self.stop.store(true, Ordering::SeqCst);
                let _ = sender.send(WorkerMessage::Failed {
                    worker_id: self.id,
                    error,
                });
            }
        }

        stat.duration = start.elapsed();
        info!("Worker {} exits after {} episodes", self.id, stat.episodes);
        let _ = sender.send(WorkerMessage::Exited(stat));
    }

    fn build_env(&self, guard_init_env: &Mutex<()>) -> Result<E, EpisodicError> {
        let _guard = guard_init_env
            .lock()
            .map_err(|_| EpisodicError::LockPoisoned("environment init guard".to_string()))?;
        E::build(&self.env_config, self.id as i64).map_err(|source| EpisodicError::EnvBuildError {
            worker: self.id,
            source,
        })
    }

    fn episode_loop(&mut self, env: &mut E, sender: &Sender<WorkerMessage>, stat: &mut WorkerStat) {
        loop {
            if self.stop.load(Ordering::SeqCst) {
                debug!("Worker {} observed the stop signal", self.id);
                break;
            }

            // Claim an episode index; indices past the budget are never run
            let episode = self.next_episode.fetch_add(1, Ordering::SeqCst);
            if episode >= self.max_episodes {
                break;
            }

            let result = panic::catch_unwind(AssertUnwindSafe(|| {
                self.executor
                    .run_episode(&mut self.agent, env, &mut self.schedule, episode)
            }))
            .unwrap_or_else(|payload| {
                let msg = panic_message(payload.as_ref());
                warn!("Worker {} panicked in episode {}: {}", self.id, episode, msg);
                Err(EpisodicError::ExecutionError {
                    episode,
                    source: anyhow::anyhow!("worker {} panicked: {}", self.id, msg),
                })
            });

            match result {
                Ok(record) => {
                    stat.episodes += 1;
                    stat.timesteps += record.length;
                    let (ack_sender, ack_receiver) = bounded(1);
                    let msg = WorkerMessage::EpisodeFinished {
                        worker_id: self.id,
                        record,
                        ack: ack_sender,
                    };
                    if sender.send(msg).is_err() || ack_receiver.recv().is_err() {
                        break;
                    }
                }
                Err(error) => {
                    self.stop.store(true, Ordering::SeqCst);
                    let _ = sender.send(WorkerMessage::Failed {
                        worker_id: self.id,
                        error,
                    });
                    break;
                }
            }
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        *s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
